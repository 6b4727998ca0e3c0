//! Content stream tokens and show-text rewriting
//!
//! lopdf groups operands with their operator. Rewriting works on a flat token
//! sequence in document order instead (operands first, then the operator), so
//! a show-text operator can be matched with the operand directly before it.

use lopdf::content::Operation;
use lopdf::{Object, StringFormat};
use crate::error::{Error, Result};
use crate::substitute::{latin1_decode, latin1_encode, substitute, ReplacementSet};

/// A single operator or operand of a content stream
#[derive(Debug, Clone, PartialEq)]
pub enum ContentToken {
    Operator(String),
    Text(Vec<u8>, StringFormat),
    Array(Vec<Object>),
    Integer(i64),
    Real(f32),
    Other(Object),
}

impl ContentToken {
    fn from_operand(object: Object) -> Self {
        match object {
            Object::String(bytes, format) => ContentToken::Text(bytes, format),
            Object::Array(items) => ContentToken::Array(items),
            Object::Integer(n) => ContentToken::Integer(n),
            Object::Real(n) => ContentToken::Real(n),
            other => ContentToken::Other(other),
        }
    }

    fn into_operand(self) -> Option<Object> {
        match self {
            ContentToken::Operator(_) => None,
            ContentToken::Text(bytes, format) => Some(Object::String(bytes, format)),
            ContentToken::Array(items) => Some(Object::Array(items)),
            ContentToken::Integer(n) => Some(Object::Integer(n)),
            ContentToken::Real(n) => Some(Object::Real(n)),
            ContentToken::Other(object) => Some(object),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ContentToken::Operator(_) => "operator",
            ContentToken::Text(..) => "string",
            ContentToken::Array(_) => "array",
            ContentToken::Integer(_) | ContentToken::Real(_) => "number",
            ContentToken::Other(_) => "object",
        }
    }
}

/// Operators that paint text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowText {
    /// `Tj`, `'` and `"`: the string is the last operand
    String,
    /// `TJ`: an array of strings and kerning adjustments
    Array,
}

impl ShowText {
    pub fn from_operator(operator: &str) -> Option<Self> {
        match operator {
            "Tj" | "'" | "\"" => Some(ShowText::String),
            "TJ" => Some(ShowText::Array),
            _ => None,
        }
    }
}

/// Flatten operations into document-order tokens
pub fn tokenize(operations: Vec<Operation>) -> Vec<ContentToken> {
    let mut tokens = Vec::new();
    for operation in operations {
        tokens.extend(operation.operands.into_iter().map(ContentToken::from_operand));
        tokens.push(ContentToken::Operator(operation.operator));
    }
    tokens
}

/// Regroup tokens into operations
pub fn untokenize(tokens: Vec<ContentToken>) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();
    let mut operands = Vec::new();

    for token in tokens {
        match token {
            ContentToken::Operator(operator) => {
                operations.push(Operation::new(&operator, std::mem::take(&mut operands)));
            }
            operand => {
                if let Some(object) = operand.into_operand() {
                    operands.push(object);
                }
            }
        }
    }

    if !operands.is_empty() {
        return Err(Error::ContentStream(format!(
            "{} operand(s) at the end of the stream without an operator",
            operands.len()
        )));
    }

    Ok(operations)
}

enum ScanState {
    AwaitingOperand,
    HaveOperand(usize),
}

/// Run `replacements` over the operands of every show-text operator
///
/// Returns the number of operands that changed. Every `TJ` array is collapsed
/// into a single string holding its substituted text, dropping its kerning
/// adjustments. Single strings whose text is unchanged are left as they were.
///
/// # Errors
///
/// [`Error::ContentStream`] when a show-text operator is not directly preceded
/// by an operand of the matching kind.
pub fn rewrite_tokens(tokens: &mut [ContentToken], replacements: &ReplacementSet) -> Result<usize> {
    let mut state = ScanState::AwaitingOperand;
    let mut rewritten = 0;

    for index in 0..tokens.len() {
        let show = match &tokens[index] {
            ContentToken::Operator(operator) => ShowText::from_operator(operator).map(|s| (s, operator.clone())),
            _ => {
                state = ScanState::HaveOperand(index);
                continue;
            }
        };

        if let Some((show, operator)) = show {
            let operand_index = match state {
                ScanState::HaveOperand(operand_index) => operand_index,
                ScanState::AwaitingOperand => {
                    return Err(Error::ContentStream(format!(
                        "operator {} at token {} has no operand",
                        operator, index
                    )));
                }
            };

            let changed = match (show, &mut tokens[operand_index]) {
                (ShowText::String, ContentToken::Text(bytes, _)) => rewrite_string(bytes, replacements),
                (ShowText::Array, ContentToken::Array(items)) => rewrite_array(items, replacements),
                (_, operand) => {
                    return Err(Error::ContentStream(format!(
                        "operator {} at token {} is preceded by a {}",
                        operator,
                        index,
                        operand.kind()
                    )));
                }
            };

            if changed {
                rewritten += 1;
            }
        }

        state = ScanState::AwaitingOperand;
    }

    Ok(rewritten)
}

fn rewrite_string(bytes: &mut Vec<u8>, replacements: &ReplacementSet) -> bool {
    let text = latin1_decode(bytes);
    let replaced = substitute(&text, replacements);
    if replaced == text {
        return false;
    }

    *bytes = encode_text(&replaced);
    true
}

fn rewrite_array(items: &mut Vec<Object>, replacements: &ReplacementSet) -> bool {
    let mut format = None;
    let mut joined = Vec::new();
    for item in items.iter() {
        if let Object::String(bytes, item_format) = item {
            format.get_or_insert(*item_format);
            joined.extend_from_slice(bytes);
        }
    }

    let text = latin1_decode(&joined);
    let replaced = substitute(&text, replacements);
    let bytes = if replaced == text { joined } else { encode_text(&replaced) };

    let collapsed = vec![Object::String(bytes, format.unwrap_or(StringFormat::Literal))];
    if *items == collapsed {
        return false;
    }
    *items = collapsed;
    true
}

fn encode_text(text: &str) -> Vec<u8> {
    let (bytes, lost) = latin1_encode(text);
    if lost > 0 {
        log::warn!(
            "{} character(s) in {:?} cannot be encoded as ISO-8859-1 and were replaced with '?'",
            lost,
            text
        );
    }
    bytes
}

/// Concatenated text of every show-text operand, one entry per operator
pub fn shown_text(tokens: &[ContentToken]) -> Vec<String> {
    let mut shown = Vec::new();
    let mut previous: Option<&ContentToken> = None;

    for token in tokens {
        if let ContentToken::Operator(operator) = token {
            match (ShowText::from_operator(operator), previous) {
                (Some(ShowText::String), Some(ContentToken::Text(bytes, _))) => {
                    shown.push(latin1_decode(bytes));
                }
                (Some(ShowText::Array), Some(ContentToken::Array(items))) => {
                    let bytes: Vec<u8> = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(bytes.as_slice()),
                            _ => None,
                        })
                        .flatten()
                        .copied()
                        .collect();
                    shown.push(latin1_decode(&bytes));
                }
                _ => {}
            }
        }
        previous = Some(token);
    }

    shown
}
