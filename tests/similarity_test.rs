use news_summary_eval::similarity::{
    cosine_similarity, jaccard_similarity, keyword_overlap, tfidf_scores, top_keywords,
    TfidfVectorizer,
};
use proptest::prelude::*;

fn docs(texts: &[&str]) -> Vec<String> {
    texts.iter().map(ToString::to_string).collect()
}

#[test]
fn test_identical_texts_score_one() {
    let text = "국회 예산안 처리 합의";
    assert!((jaccard_similarity(text, text) - 1.0).abs() < 1e-12);
    assert!((keyword_overlap(text, text, 10) - 1.0).abs() < 1e-12);

    let scores = tfidf_scores(&docs(&[text]), &docs(&[text]), 500, (1, 2)).unwrap();
    assert!((scores[0] - 1.0).abs() < 1e-9);
}

#[test]
fn test_disjoint_texts_score_zero() {
    let original = "오늘 날씨가 좋습니다 정말";
    let summary = "날씨 좋음";

    assert_eq!(jaccard_similarity(original, summary), 0.0);
    assert_eq!(keyword_overlap(original, summary, 10), 0.0);
    let scores = tfidf_scores(&docs(&[original]), &docs(&[summary]), 500, (1, 2)).unwrap();
    assert_eq!(scores, vec![0.0]);
}

#[test]
fn test_empty_token_sets() {
    assert_eq!(jaccard_similarity("", ""), 1.0);
    assert_eq!(jaccard_similarity("", "뉴스"), 0.0);
    assert_eq!(keyword_overlap("뉴스", "", 10), 0.0);
}

#[test]
fn test_jaccard_partial_overlap() {
    // {a, b, c} vs {b, c, d}: 2 shared of 4
    assert!((jaccard_similarity("a b c", "b c d") - 0.5).abs() < 1e-12);
}

#[test]
fn test_top_keywords_ties_keep_first_seen_order() {
    assert_eq!(top_keywords("다 나 가 나 다", 2), vec!["다", "나"]);
    assert_eq!(top_keywords("가 나 다", 2), vec!["가", "나"]);
}

#[test]
fn test_keyword_overlap_uses_only_top_n() {
    // top-1 of each side: "경제" vs "경제"
    assert_eq!(keyword_overlap("경제 경제 정치", "경제 사회", 1), 1.0);
}

#[test]
fn test_tfidf_shared_vocabulary_is_deterministic() {
    let originals = docs(&["반도체 수출 증가 소식", "국회 예산안 합의 소식"]);
    let summaries = docs(&["반도체 수출 증가", "예산안 합의"]);

    let first = tfidf_scores(&originals, &summaries, 500, (1, 2)).unwrap();
    let second = tfidf_scores(&originals, &summaries, 500, (1, 2)).unwrap();
    assert_eq!(first, second);
    for score in first {
        assert!(score > 0.0 && score <= 1.0);
    }
}

#[test]
fn test_tfidf_rejects_mismatched_lengths() {
    assert!(tfidf_scores(&docs(&["하나"]), &[], 500, (1, 2)).is_err());
}

#[test]
fn test_vectorizer_rejects_bad_settings() {
    assert!(TfidfVectorizer::new(0, (1, 2)).is_err());
    assert!(TfidfVectorizer::new(500, (2, 1)).is_err());
    assert!(TfidfVectorizer::new(500, (0, 1)).is_err());
}

#[test]
fn test_transform_rows_are_unit_length() {
    let mut vectorizer = TfidfVectorizer::new(500, (1, 2)).unwrap();
    let rows = vectorizer.fit_transform(&docs(&["정부 발표 내용", "정부 정책 발표"]));
    for row in rows {
        let norm: f64 = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }
}

#[test]
fn test_cosine_of_zero_vector() {
    assert_eq!(cosine_similarity(&[], &[(0, 1.0)]), 0.0);
}

proptest! {
    #[test]
    fn scores_stay_in_unit_interval(
        original in "[가-하a-e ]{0,40}",
        summary in "[가-하a-e ]{0,20}",
    ) {
        let jaccard = jaccard_similarity(&original, &summary);
        let keyword = keyword_overlap(&original, &summary, 10);
        let tfidf = tfidf_scores(&[original.clone()], &[summary.clone()], 500, (1, 2)).unwrap()[0];

        for score in [jaccard, keyword, tfidf] {
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }

    #[test]
    fn jaccard_is_symmetric(a in "[a-f ]{0,30}", b in "[a-f ]{0,30}") {
        prop_assert_eq!(jaccard_similarity(&a, &b), jaccard_similarity(&b, &a));
    }
}
