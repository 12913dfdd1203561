//! Word tokenization and sentence segmentation shared by the stylometric
//! extractor and the vectorizer analyzer.

/// Split text into case-folded word tokens.
///
/// A word is a maximal run of alphanumeric characters; an apostrophe is kept
/// when it sits between two alphanumerics ("don't" stays one token). All
/// other punctuation separates tokens.
pub fn words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_alphanumeric() {
            current.extend(ch.to_lowercase());
        } else if (ch == '\'' || ch == '\u{2019}')
            && !current.is_empty()
            && chars.get(i + 1).is_some_and(|c| c.is_alphanumeric())
        {
            current.push('\'');
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Split text into sentences.
///
/// Terminators are '.', '!' and '?'. A '.' flanked by digits is treated as a
/// decimal point, and runs of terminators ("...", "?!") end a single
/// sentence. Trailing text without a terminator forms a final sentence.
pub fn sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = Vec::new();
    let mut buffer = String::new();
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        buffer.push(ch);

        if is_terminator(ch) {
            // Decimal numbers like "3.5" do not end a sentence.
            if ch == '.'
                && i > 0
                && chars[i - 1].is_ascii_digit()
                && chars.get(i + 1).is_some_and(char::is_ascii_digit)
            {
                i += 1;
                continue;
            }

            // Absorb the rest of a terminator run.
            while chars.get(i + 1).is_some_and(|&c| is_terminator(c)) {
                i += 1;
                buffer.push(chars[i]);
            }

            let sentence = buffer.trim();
            if !sentence.is_empty() {
                out.push(sentence.to_string());
            }
            buffer.clear();
        }
        i += 1;
    }

    let rest = buffer.trim();
    if !rest.is_empty() {
        out.push(rest.to_string());
    }
    out
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}
