/// Returned whenever the text is too short or too ambiguous to classify.
pub const UNKNOWN: &str = "unknown";

/// Best-guess two-letter code of the statement's natural language, in the
/// style the existing corpus uses (`en`, `ru`, `zh-cn`).
pub fn detect(text: &str) -> String {
    if !text.chars().any(char::is_alphabetic) {
        return UNKNOWN.to_string();
    }
    whatlang::detect(text)
        .map(|info| short_code(info.lang().code()).to_string())
        .unwrap_or_else(|| UNKNOWN.to_string())
}

/// ISO 639-3 to the corpus's ISO 639-1 codes. Anything unmapped keeps its
/// three-letter code.
fn short_code(code: &'static str) -> &'static str {
    match code {
        "afr" => "af",
        "aka" => "ak",
        "amh" => "am",
        "ara" => "ar",
        "aze" => "az",
        "bel" => "be",
        "ben" => "bn",
        "bul" => "bg",
        "cat" => "ca",
        "ces" => "cs",
        "cmn" => "zh-cn",
        "dan" => "da",
        "deu" => "de",
        "ell" => "el",
        "eng" => "en",
        "epo" => "eo",
        "est" => "et",
        "fin" => "fi",
        "fra" => "fr",
        "guj" => "gu",
        "heb" => "he",
        "hin" => "hi",
        "hrv" => "hr",
        "hun" => "hu",
        "hye" => "hy",
        "ind" => "id",
        "ita" => "it",
        "jav" => "jv",
        "jpn" => "ja",
        "kan" => "kn",
        "kat" => "ka",
        "khm" => "km",
        "kor" => "ko",
        "lat" => "la",
        "lav" => "lv",
        "lit" => "lt",
        "mal" => "ml",
        "mar" => "mr",
        "mkd" => "mk",
        "mya" => "my",
        "nep" => "ne",
        "nld" => "nl",
        "nob" => "no",
        "ori" => "or",
        "pan" => "pa",
        "pes" => "fa",
        "pol" => "pl",
        "por" => "pt",
        "ron" => "ro",
        "rus" => "ru",
        "sin" => "si",
        "slk" => "sk",
        "slv" => "sl",
        "sna" => "sn",
        "spa" => "es",
        "srp" => "sr",
        "swe" => "sv",
        "tam" => "ta",
        "tel" => "te",
        "tgl" => "tl",
        "tha" => "th",
        "tuk" => "tk",
        "tur" => "tr",
        "ukr" => "uk",
        "urd" => "ur",
        "uzb" => "uz",
        "vie" => "vi",
        "yid" => "yi",
        "zul" => "zu",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_statement() {
        let text = "Problem Description\nCalculate the sum of two integers. \
                    Each line of the input contains two numbers and you must print their sum.";
        assert_eq!(detect(text), "en");
    }

    #[test]
    fn russian_statement() {
        let text = "Даны два целых числа. Требуется вычислить их сумму и вывести результат на экран.";
        assert_eq!(detect(text), "ru");
    }

    #[test]
    fn chinese_statement() {
        assert_eq!(detect("给定两个整数，计算它们的和并输出结果。"), "zh-cn");
    }

    #[test]
    fn unmapped_codes_pass_through() {
        assert_eq!(short_code("eng"), "en");
        assert_eq!(short_code("xyz"), "xyz");
    }

    #[test]
    fn degenerate_text_is_unknown() {
        assert_eq!(detect(""), UNKNOWN);
        assert_eq!(detect("   \n\t"), UNKNOWN);
        assert_eq!(detect("1 2 3\n42"), UNKNOWN);
    }
}
