//! End-to-end extraction over realistic campaign texts.

use chrono::NaiveDate;
use kampanya_core::{
    extract, CampaignEngine, CampaignExtractor, ExtractionHints, Participation, RewardStrategy,
    RewardType,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn amount(n: i64) -> Option<Decimal> {
    Some(Decimal::from(n))
}

fn hints() -> ExtractionHints {
    ExtractionHints::default()
}

#[test]
fn test_percentage_discount_with_cap() {
    let result = extract("%10 indirim, en fazla 300 TL", date(2026, 1, 1), &hints());

    assert_eq!(result.economics.reward_percentage, amount(10));
    assert_eq!(result.economics.reward_cap, amount(300));
    assert_eq!(result.economics.min_spend, amount(3000));
    assert_eq!(result.economics.reward_type, Some(RewardType::Discount));
    assert_eq!(result.reward_text.as_deref(), Some("%10 (max 300 TL)"));
    assert!(result.partial);
}

#[test]
fn test_recurring_points_with_cap() {
    let result = extract(
        "Her 1.000 TL harcamaya 50 TL puan, toplamda 500 TL'ye kadar",
        date(2026, 1, 1),
        &hints(),
    );

    assert_eq!(result.strategy, Some(RewardStrategy::Recurring));
    assert_eq!(result.economics.min_spend, amount(10000));
    assert_eq!(result.economics.reward_cap, amount(500));
    assert_eq!(result.economics.reward_type, Some(RewardType::Points));
}

#[test]
fn test_tiered_rewards() {
    let result = extract(
        "5.000 TL ve üzeri harcamaya 250 TL, 10.000 TL ve üzeri harcamaya 500 TL",
        date(2026, 1, 1),
        &hints(),
    );

    assert_eq!(result.strategy, Some(RewardStrategy::Tiered));
    assert_eq!(result.economics.min_spend, amount(10000));
    assert_eq!(result.economics.reward_cap, amount(500));
}

#[test]
fn test_shared_year_range() {
    let result = extract("1 Şubat - 28 Şubat 2026", date(2026, 1, 10), &hints());

    assert_eq!(result.validity.start_date, Some(date(2026, 2, 1)));
    assert_eq!(result.validity.end_date, Some(date(2026, 2, 28)));
}

#[test]
fn test_day_range_rolls_into_next_year() {
    let result = extract("1-28 Şubat", date(2026, 3, 1), &hints());

    assert_eq!(result.validity.start_date, Some(date(2027, 2, 1)));
    assert_eq!(result.validity.end_date, Some(date(2027, 2, 28)));
    assert!(result.validity.start_inferred);
}

#[test]
fn test_complete_campaign_is_not_partial() {
    let text = "01.03.2026 - 31.03.2026 tarihleri arasında \
                1.000 TL ve üzeri harcamaya 100 TL nakit iade!\n\
                Banka kampanya koşullarında değişiklik yapma hakkını saklı tutar.";
    let result = extract(text, date(2026, 2, 15), &hints());

    assert_eq!(result.economics.min_spend, amount(1000));
    assert_eq!(result.economics.reward_amount, amount(100));
    assert_eq!(result.economics.reward_type, Some(RewardType::Cashback));
    assert_eq!(result.validity.start_date, Some(date(2026, 3, 1)));
    assert_eq!(result.validity.end_date, Some(date(2026, 3, 31)));
    assert!(result.issues.is_empty());
    assert!(!result.partial);
}

#[test]
fn test_year_token_never_becomes_an_amount() {
    let texts = [
        "2026 kampanyası! Her 1.000 TL harcamaya 50 TL puan",
        "2027 yılında %10 indirim, en fazla 250 TL",
        "Sadece 2026 yılı için 750 TL ve üzeri alışverişe 75 TL indirim",
    ];
    let year_like = [Decimal::from(2026), Decimal::from(2027)];

    for text in texts {
        let economics = extract(text, date(2026, 1, 1), &hints()).economics;
        for value in [economics.min_spend, economics.reward_cap, economics.reward_amount]
            .into_iter()
            .flatten()
        {
            assert!(!year_like.contains(&value), "{} leaked into {:?}", value, text);
        }
    }
}

#[test]
fn test_installment_only_offer() {
    let result = extract(
        "Peşin fiyatına 6 taksit! 1.000 TL ve üzeri alışverişlerde geçerlidir.",
        date(2026, 1, 1),
        &hints(),
    );

    assert_eq!(result.economics.reward_type, Some(RewardType::InstallmentOnly));
    assert_eq!(result.economics.installment_count, Some(6));
    assert_eq!(result.economics.min_spend, amount(1000));
    assert_eq!(result.reward_text.as_deref(), Some("+6 Taksit"));
}

#[test]
fn test_source_profile_currency_counts_as_points() {
    let engine = CampaignEngine::default();
    let hints = ExtractionHints::new().with_source("akbank");
    let result = engine.extract(
        "500 TL ve üzeri harcamaya 50 chip-para. KAZAN yazıp 4566'ya SMS gönderin.",
        date(2026, 1, 1),
        &hints,
    );

    assert_eq!(result.economics.reward_type, Some(RewardType::Points));
    assert_eq!(result.economics.reward_amount, amount(50));
    assert_eq!(
        result.participation,
        Some(Participation::Sms {
            keyword: "KAZAN".to_string(),
            number: "4566".to_string(),
        })
    );
}

#[test]
fn test_trait_object_seam() {
    let engine: Box<dyn CampaignExtractor + Send + Sync> = Box::new(CampaignEngine::default());
    let result = engine.extract("Kampanya detayları için tıklayın", date(2026, 1, 1), &hints());

    assert!(result.economics.is_empty());
    assert_eq!(result.strategy, None);
    assert!(result.partial);
}

#[test]
fn test_extraction_is_idempotent() {
    let text =
        "Her 1.000 TL harcamaya 50 TL puan, toplamda 500 TL'ye kadar. 31 Mart'a kadar geçerlidir.";
    let first = serde_json::to_string(&extract(text, date(2026, 3, 1), &hints())).unwrap();
    let second = serde_json::to_string(&extract(text, date(2026, 3, 1), &hints())).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_json_shape() {
    let result = extract("%10 indirim, en fazla 300 TL", date(2026, 1, 1), &hints());
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["economics"]["min_spend"], "3000");
    assert_eq!(json["economics"]["reward_type"], "discount");
    assert_eq!(json["strategy"], "percentage_cap");
    assert_eq!(json["validity"]["start_date"], serde_json::Value::Null);
}

#[test]
fn test_total_on_garbage() {
    let inputs = [
        "",
        "%%%",
        "₺₺₺ TL TL",
        "999999999999999999999999999999 TL ve üzeri",
        "31.02.2026 - 01.01.2025",
        "Her 0 TL harcamaya 0 TL",
        "yüzde yüzde % , . ! ?",
        "\u{0000}\u{0307}İ\u{00a0}–—",
        "1.000.000.000.000 TL ve üzeri harcamaya %100 iade, en fazla 1 TL",
        "30 - 1 Şubat",
    ];

    for input in inputs {
        let result = extract(input, date(2026, 6, 15), &hints());
        assert!(result.validity.is_ordered(), "unordered window for {:?}", input);
    }
}

#[test]
fn test_plausibility_bounds_are_dropped() {
    let low = extract("Her 100 TL harcamaya 10 TL puan", date(2026, 1, 1), &hints());
    assert_eq!(low.economics.reward_amount, None);
    assert_ne!(low.strategy, Some(RewardStrategy::Recurring));
    assert!(low.partial);

    let high = extract(
        "5.000.000 TL ve üzeri harcamaya 100 TL indirim",
        date(2026, 1, 1),
        &hints(),
    );
    assert_eq!(high.economics.min_spend, None);
}

#[test]
fn test_zero_interest_wording_is_installment_only() {
    let result = extract("Peşin fiyatına %0 faizle 6 taksit", date(2026, 1, 1), &hints());

    assert_eq!(result.strategy, Some(RewardStrategy::InstallmentOnly));
    assert_eq!(result.economics.reward_type, Some(RewardType::InstallmentOnly));
    assert_eq!(result.economics.installment_count, Some(6));
    assert_eq!(result.reward_text.as_deref(), Some("+6 Taksit"));
}

#[test]
fn test_date_range_after_title_line() {
    let texts = [
        "Elektronik alışverişlerine +3 Taksit\n1 Şubat - 28 Şubat 2026 tarihleri arasında",
        "Market harcamalarına 50 TL\n1 Şubat - 28 Şubat 2026",
    ];

    for text in texts {
        let result = extract(text, date(2026, 1, 10), &hints());
        assert_eq!(result.validity.start_date, Some(date(2026, 2, 1)), "{:?}", text);
        assert_eq!(result.validity.end_date, Some(date(2026, 2, 28)), "{:?}", text);
    }
}

#[test]
fn test_ordinal_word_campaign() {
    let result = extract(
        "1.000 TL ve üzeri ikinci alışverişinize 150 TL nakit iade",
        date(2026, 1, 1),
        &hints(),
    );

    assert_eq!(result.strategy, Some(RewardStrategy::OrdinalStep));
    assert_eq!(result.economics.min_spend, amount(2000));
    assert_eq!(result.economics.reward_amount, amount(150));
    assert_eq!(result.economics.reward_type, Some(RewardType::Cashback));
}
