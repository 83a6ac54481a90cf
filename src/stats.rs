use std::collections::BTreeMap;

use crate::record::Record;

#[derive(Debug, Default, PartialEq)]
pub struct CorpusStats {
    pub total: usize,
    pub failed: usize,
    pub with_images: usize,
    pub with_unit_tests: usize,
    pub languages: BTreeMap<String, usize>,
}

pub fn collect(records: &[Record]) -> CorpusStats {
    let mut stats = CorpusStats {
        total: records.len(),
        ..CorpusStats::default()
    };
    for record in records {
        match record {
            Record::Failure(_) => stats.failed += 1,
            Record::Success(p) => {
                if p.has_image {
                    stats.with_images += 1;
                }
                if p.test_cases.is_some() {
                    stats.with_unit_tests += 1;
                }
                *stats.languages.entry(p.language.clone()).or_default() += 1;
            }
        }
    }
    stats
}

pub fn render_markdown(stats: &CorpusStats) -> String {
    let kept = stats.total - stats.failed;
    let mut md = String::new();
    md.push_str("| metric | count | % |\n|---|---:|---:|\n");
    for (name, count, of) in [
        ("records", stats.total, stats.total),
        ("failed", stats.failed, stats.total),
        ("kept", kept, stats.total),
        ("with unit tests", stats.with_unit_tests, kept),
        ("with images", stats.with_images, kept),
    ] {
        md.push_str(&format!("| {} | {} | {:.1} |\n", name, count, percent(count, of)));
    }

    if !stats.languages.is_empty() {
        md.push_str("\n| language | count |\n|---|---:|\n");
        let mut langs: Vec<_> = stats.languages.iter().collect();
        langs.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (lang, count) in langs {
            md.push_str(&format!("| {} | {} |\n", lang, count));
        }
    }
    md
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Problem;

    fn problem(language: &str, has_image: bool, tests: bool) -> Record {
        Record::Success(Problem {
            url: "u".into(),
            title: "t".into(),
            description: "d".into(),
            raw_input: String::new(),
            raw_output: String::new(),
            test_cases: tests.then(Vec::new),
            language: language.into(),
            has_image,
        })
    }

    #[test]
    fn counts_by_variant_and_language() {
        let records = vec![
            problem("en", true, true),
            problem("en", false, false),
            problem("ru", false, true),
            Record::failed(None),
        ];
        let s = collect(&records);
        assert_eq!(s.total, 4);
        assert_eq!(s.failed, 1);
        assert_eq!(s.with_images, 1);
        assert_eq!(s.with_unit_tests, 2);
        assert_eq!(s.languages["en"], 2);

        let md = render_markdown(&s);
        assert!(md.contains("| failed | 1 | 25.0 |"));
        assert!(md.find("| en | 2 |").unwrap() < md.find("| ru | 1 |").unwrap());
    }

    #[test]
    fn empty_input() {
        let md = render_markdown(&collect(&[]));
        assert!(md.contains("| records | 0 | 0.0 |"));
        assert!(!md.contains("language"));
    }
}
