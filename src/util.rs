pub fn mean(data: &[f64]) -> Option<f64> {
    let sum = data.iter().sum::<f64>();
    let count = data.len();

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

/// Count the words in a drill string. Tokens are split on spaces, periods
/// and opening parens; stray commas/semicolons don't count as words.
pub fn word_count(text: &str) -> usize {
    text.split(|c: char| matches!(c, ' ' | '(' | '.'))
        .filter(|token| !token.trim_matches(|c: char| matches!(c, ',' | ';')).is_empty())
        .count()
}
