use crate::error::{Result, VersegrepError};

/// Parser for the combined search query language.
///
/// `((in OR tree) AND the) AND (house OR bush)` parses to the word groups
/// `["in the house", "in the bush", "tree the house", "tree the bush"]`,
/// and `created NOT (and OR but)` to `["created"]` with the NOT list
/// `["and", "but"]`.
pub struct CombinedParse {
    word_list: Vec<String>,
    not_list: Vec<String>,
}

enum Token {
    Word(String),
    Group(Vec<Token>),
}

impl CombinedParse {
    pub fn new(arg_str: &str) -> Result<Self> {
        let mut chars = arg_str.chars();
        let tokens = parse_tokens(&mut chars, false)?;
        let (word_list, not_list) = parse_list(&tokens);
        Ok(CombinedParse { word_list, not_list })
    }

    /// Word groups to search for (each group is a space-joined phrase).
    pub fn word_list(&self) -> &[String] {
        &self.word_list
    }

    /// Word groups that exclude a verse from the results.
    pub fn not_list(&self) -> &[String] {
        &self.not_list
    }
}

/// Tokenize the expression, turning parenthesized spans into nested
/// groups.  Unbalanced parentheses are a terminal parse error.
fn parse_tokens(chars: &mut std::str::Chars<'_>, in_group: bool) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut temp_str = String::new();

    loop {
        match chars.next() {
            Some('(') => {
                flush_words(&mut temp_str, &mut tokens);
                tokens.push(Token::Group(parse_tokens(chars, true)?));
            }
            Some(')') => {
                if !in_group {
                    return Err(VersegrepError::CombinedParse(
                        "unmatched ')'".to_string(),
                    ));
                }
                flush_words(&mut temp_str, &mut tokens);
                return Ok(tokens);
            }
            Some(c) => temp_str.push(c),
            None => {
                if in_group {
                    return Err(VersegrepError::CombinedParse(
                        "missing closing ')'".to_string(),
                    ));
                }
                flush_words(&mut temp_str, &mut tokens);
                return Ok(tokens);
            }
        }
    }
}

fn flush_words(temp_str: &mut String, tokens: &mut Vec<Token>) {
    for word in temp_str.split_whitespace() {
        tokens.push(Token::Word(word.to_string()));
    }
    temp_str.clear();
}

/// Evaluate a token list into word groups and a NOT list.
///
/// `AND` combines the accumulated groups with the next operand as a cross
/// product, `OR` is the implicit default and is skipped, and `NOT` routes
/// the next operand into the NOT list.
fn parse_list(tokens: &[Token]) -> (Vec<String>, Vec<String>) {
    let mut working_list: Vec<String> = Vec::new();
    let mut not_list: Vec<String> = Vec::new();

    for token in tokens {
        match token {
            Token::Word(word) if word == "OR" => continue,
            Token::Group(group) => {
                let (temp_list, temp_not_list) = parse_list(group);
                not_list.extend(temp_not_list);
                match working_list.last().map(String::as_str) {
                    Some("AND") => {
                        working_list.pop();
                        // Cross every accumulated group with every group
                        // from the parenthesized operand.
                        working_list = working_list
                            .iter()
                            .flat_map(|left| {
                                temp_list.iter().map(move |right| format!("{left} {right}"))
                            })
                            .collect();
                    }
                    Some("NOT") => {
                        working_list.pop();
                        not_list.extend(temp_list);
                    }
                    _ => working_list.extend(temp_list),
                }
            }
            Token::Word(word) if word == "AND" => working_list.push(word.clone()),
            Token::Word(word) => match working_list.last().map(String::as_str) {
                Some("AND") => {
                    working_list.pop();
                    working_list = working_list
                        .iter()
                        .map(|left| format!("{left} {word}"))
                        .collect();
                }
                Some("NOT") => {
                    working_list.pop();
                    not_list.push(word.clone());
                }
                _ => working_list.push(word.clone()),
            },
        }
    }

    // Collapse any runs of whitespace inside the combined groups.
    let working_list = working_list
        .iter()
        .map(|group| group.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect();

    (working_list, not_list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_or_product() {
        let parsed = CombinedParse::new("((in OR tree) AND the) AND (house OR bush)").unwrap();
        assert_eq!(
            parsed.word_list(),
            ["in the house", "in the bush", "tree the house", "tree the bush"]
        );
        assert!(parsed.not_list().is_empty());
    }

    #[test]
    fn not_group() {
        let parsed = CombinedParse::new("created NOT (and OR but)").unwrap();
        assert_eq!(parsed.word_list(), ["created"]);
        assert_eq!(parsed.not_list(), ["and", "but"]);
    }

    #[test]
    fn simple_and() {
        let parsed = CombinedParse::new("he AND said").unwrap();
        assert_eq!(parsed.word_list(), ["he said"]);
    }

    #[test]
    fn bare_words_are_or() {
        let parsed = CombinedParse::new("faith hope love").unwrap();
        assert_eq!(parsed.word_list(), ["faith", "hope", "love"]);
    }

    #[test]
    fn unbalanced_parens_error() {
        assert!(CombinedParse::new("created NOT (and OR but").is_err());
        assert!(CombinedParse::new("created) bad").is_err());
    }
}
