//! Common regex patterns for Turkish campaign extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Turkish amount: `1.000`, `12.500,50`, `250`, `99,90`.
pub const AMOUNT: &str = r"(\d{1,3}(?:\.\d{3})+(?:,\d{1,2})?|\d+(?:,\d{1,2})?)";

/// Currency unit with an optional case suffix (`TL'ye`, `TL'lik`).
pub const CURRENCY: &str = r"(?:(?:TL|TRY)\b|₺)(?:'[a-zçğıöşü]+)?";

const DAY: &str = r"(\d{1,2})";
const MONTH: &str = r"((?:ocak|[şs]ubat|mart|nisan|may[ıi]s|haziran|temmuz|a[ğg]ustos|eyl[üu]l|ekim|kas[ıi]m|aral[ıi]k)\b)(?:'[a-zçğıöşü]+)?";
const YEAR: &str = r"(\d{4})";
const SUFFIX: &str = r"(?:'[a-zçğıöşü]+)?";
const RANGE_SEP: &str = r"(?:\s*-\s*|\s+ile\s+|\s+)";

lazy_static! {
    // Numeric tokens
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(&format!(r"\b{AMOUNT}")).unwrap();

    pub static ref YEAR_TOKEN: Regex = Regex::new(r"\b(20[2-9]\d)\b").unwrap();

    // A month name or a `D.M.` prefix directly before a year
    pub static ref DATE_PREFIX: Regex = Regex::new(
        r"(?i)(?:\b([a-zçğıöşü]+)(?:'[a-zçğıöşü]+)?\s+|\b\d{1,2}[./-]\d{1,2}[./-])$"
    ).unwrap();

    // Spend thresholds
    pub static ref THRESHOLD: Regex = Regex::new(&format!(
        r"(?i)\b{AMOUNT}\s*{CURRENCY}\s+(?:ve\s+)?(?:üzer|üst)\w*"
    )).unwrap();

    pub static ref AT_LEAST: Regex = Regex::new(&format!(
        r"(?i)\ben\s+az\s+{AMOUNT}\s*{CURRENCY}"
    )).unwrap();

    pub static ref THRESHOLD_AHEAD: Regex = Regex::new(
        r"(?i)^\s*(?:ve\s+)?(?:üzer|üst)"
    ).unwrap();

    // Reward caps
    pub static ref CAP_PREFIX: Regex = Regex::new(&format!(
        r"(?i)\b(?:en\s+fazla|toplamda|toplam|maksimum|maks\.?|max\.?|azami)\s*:?\s*{AMOUNT}\s*{CURRENCY}"
    )).unwrap();

    pub static ref CAP_SUFFIX: Regex = Regex::new(&format!(
        r"(?i)\b{AMOUNT}\s*(?:TL|₺)'?(?:ye|ya|e|a)\s+(?:kadar|varan)\b"
    )).unwrap();

    // Reward rates
    pub static ref PERCENT: Regex = Regex::new(
        r"(?i)(?:%\s*(\d{1,3}(?:,\d{1,2})?)|\b(\d{1,3}(?:,\d{1,2})?)\s*%|\byüzde\s+(\d{1,3}(?:,\d{1,2})?))"
    ).unwrap();

    // Spend/reward structures
    pub static ref TIER_PAIR: Regex = Regex::new(&format!(
        r"(?i)\b{AMOUNT}\s*{CURRENCY}\s+(?:ve\s+)?(?:üzer|üst)\w*[^\d;]{{0,60}}?\b{AMOUNT}(?:\s*{CURRENCY})?"
    )).unwrap();

    pub static ref RECURRING: Regex = Regex::new(&format!(
        r"(?i)\bher\s+{AMOUNT}\s*{CURRENCY}[^\d;]{{0,40}}?\b{AMOUNT}(?:\s*{CURRENCY})?"
    )).unwrap();

    pub static ref ORDINAL_WORD: Regex = Regex::new(
        r"(?i)\b(birinci|ilk|ikinci|[üu][çc][üu]nc[üu]|d[öo]rd[üu]nc[üu]|be[şs]inci|alt[ıi]nc[ıi]|yedinci|sekizinci|dokuzuncu|onuncu)\s+(?:harcama|al[ıi][şs]veri[şs]|i[şs]lem)"
    ).unwrap();

    pub static ref ORDINAL_NUMERIC: Regex = Regex::new(
        r"(?i)\b(\d{1,2})\.\s*(?:harcama|al[ıi][şs]veri[şs]|i[şs]lem)"
    ).unwrap();

    // Installments: "+4 taksit", "9 aya varan taksit", "6 ay taksit"
    pub static ref INSTALLMENT_COUNT: Regex = Regex::new(
        r"(?i)(?:\+\s*)?\b(\d{1,2})\s*(?:aya\s+varan\s+|ay\s+|ek\s+)?taksit"
    ).unwrap();

    // Date layers
    pub static ref DATE_FULL_RANGE: Regex = Regex::new(&format!(
        r"(?i)\b{DAY}\s+{MONTH}\s+{YEAR}\b{SUFFIX}{RANGE_SEP}{DAY}\s+{MONTH}\s+{YEAR}\b"
    )).unwrap();

    pub static ref DATE_SHARED_YEAR: Regex = Regex::new(&format!(
        r"(?i)\b{DAY}\s+{MONTH}{RANGE_SEP}{DAY}\s+{MONTH}(?:\s+{YEAR}\b)?"
    )).unwrap();

    pub static ref DATE_DAY_RANGE: Regex = Regex::new(&format!(
        r"(?i)\b{DAY}\s*-\s*{DAY}\s+{MONTH}(?:\s+{YEAR}\b)?"
    )).unwrap();

    pub static ref DATE_NUMERIC_RANGE: Regex = Regex::new(
        r"(?i)\b(\d{1,2})[./](\d{1,2})[./](\d{4})(?:'[a-zçğıöşü]+)?(?:\s*-\s*|\s+ile\s+)(\d{1,2})[./](\d{1,2})[./](\d{4})\b"
    ).unwrap();

    pub static ref DATE_OPEN_ENDED: Regex = Regex::new(&format!(
        r"(?i)\b{DAY}\s+{MONTH}(?:\s+{YEAR})?{SUFFIX}\s+(?:tarihine\s+|tarihe\s+)?(?:kadar|dek)\b"
    )).unwrap();

    pub static ref DATE_NUMERIC_OPEN_ENDED: Regex = Regex::new(
        r"(?i)\b(\d{1,2})[./](\d{1,2})[./](\d{4})(?:'[a-zçğıöşü]+)?\s+(?:tarihine\s+|tarihe\s+)?(?:kadar|dek)\b"
    ).unwrap();

    // Participation
    pub static ref SMS_INSTRUCTION: Regex = Regex::new(
        r"\b([A-ZÇĞÖŞÜ0-9]{2,20})\s+(?i:yaz[ıi]p)(?:\s+(\d{4}))?(?:'[a-zçğıöşü]+)?\s+(?i:numaraya\s+|numaras[ıi]na\s+)?(?i:sms|mesaj|k[ıi]sa\s+mesaj)"
    ).unwrap();

    pub static ref SMS_NUMBER_FIRST: Regex = Regex::new(
        r"\b(\d{4})(?:'[a-zçğıöşü]+)?\s+([A-ZÇĞÖŞÜ0-9]{2,20})\s+(?i:yaz[ıi]p)"
    ).unwrap();

    pub static ref AUTOMATIC_PARTICIPATION: Regex = Regex::new(
        r"(?i)otomatik\s+(?:olarak\s+)?kat[ıi]l|kat[ıi]l[ıi]m\s+(?:gerektirmez|gerekmeksizin|gerekmemektedir)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        let all: [&Regex; 22] = [
            &NUMERIC_TOKEN,
            &YEAR_TOKEN,
            &DATE_PREFIX,
            &THRESHOLD,
            &AT_LEAST,
            &THRESHOLD_AHEAD,
            &CAP_PREFIX,
            &CAP_SUFFIX,
            &PERCENT,
            &TIER_PAIR,
            &RECURRING,
            &ORDINAL_WORD,
            &ORDINAL_NUMERIC,
            &INSTALLMENT_COUNT,
            &DATE_FULL_RANGE,
            &DATE_SHARED_YEAR,
            &DATE_DAY_RANGE,
            &DATE_NUMERIC_RANGE,
            &DATE_OPEN_ENDED,
            &DATE_NUMERIC_OPEN_ENDED,
            &SMS_INSTRUCTION,
            &SMS_NUMBER_FIRST,
        ];
        assert!(all.iter().all(|re| !re.as_str().is_empty()));
        assert!(AUTOMATIC_PARTICIPATION.is_match("Kampanyaya katılım gerektirmez."));
    }

    #[test]
    fn test_threshold_variants() {
        assert!(THRESHOLD.is_match("1.000 TL ve üzeri harcamaya"));
        assert!(THRESHOLD.is_match("500 TL üzeri alışverişe"));
        assert!(THRESHOLD.is_match("750TL ve üstü"));
        assert!(AT_LEAST.is_match("en az 2.500 TL'lik harcama"));
    }

    #[test]
    fn test_cap_variants() {
        assert_eq!(&CAP_PREFIX.captures("en fazla 300 TL").unwrap()[1], "300");
        assert_eq!(&CAP_PREFIX.captures("toplamda 1.500 TL'ye kadar").unwrap()[1], "1.500");
        assert_eq!(&CAP_PREFIX.captures("max 200TL").unwrap()[1], "200");
        assert_eq!(&CAP_SUFFIX.captures("250 TL'ye varan").unwrap()[1], "250");
    }

    #[test]
    fn test_percent_variants() {
        let rate = |text: &str| {
            PERCENT.captures(text).and_then(|c| {
                c.get(1).or(c.get(2)).or(c.get(3)).map(|m| m.as_str().to_string())
            })
        };
        assert_eq!(rate("%10 indirim").as_deref(), Some("10"));
        assert_eq!(rate("15% iade").as_deref(), Some("15"));
        assert_eq!(rate("yüzde 7,5 indirim").as_deref(), Some("7,5"));
    }

    #[test]
    fn test_date_layers_match() {
        assert!(DATE_FULL_RANGE.is_match("1 Şubat 2026 - 28 Şubat 2026"));
        assert!(DATE_SHARED_YEAR.is_match("1 Şubat - 28 Şubat 2026"));
        assert!(DATE_DAY_RANGE.is_match("1-28 Şubat"));
        assert!(DATE_NUMERIC_RANGE.is_match("01.02.2026 - 28.02.2026"));
        assert!(DATE_OPEN_ENDED.is_match("31 Aralık 2026'ya kadar"));
        assert!(DATE_OPEN_ENDED.is_match("28 Şubat'a kadar"));
        assert!(DATE_NUMERIC_OPEN_ENDED.is_match("31.03.2026 tarihine kadar"));
    }

    #[test]
    fn test_month_only_matches_month_names() {
        assert!(!DATE_SHARED_YEAR.is_match("3 Taksit 1 harcama"));
        assert!(!DATE_OPEN_ENDED.is_match("50 TL'ye kadar"));
        assert!(DATE_OPEN_ENDED.is_match("15 AĞUSTOS'a kadar"));
        assert!(DATE_OPEN_ENDED.is_match("30 Kasım 2026 tarihine kadar"));
        assert!(DATE_OPEN_ENDED.is_match("31 ARALIK'a kadar"));

        let caps = DATE_SHARED_YEAR
            .captures("+3 Taksit 1 Şubat - 28 Şubat 2026")
            .unwrap();
        assert_eq!(&caps[1], "1");
        assert_eq!(&caps[2], "Şubat");
    }
}
