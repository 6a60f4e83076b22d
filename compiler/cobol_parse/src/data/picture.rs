//! PICTURE string analysis.

use cobol_ir::{Picture, PictureCategory};

/// Analyse a picture string such as `S9(5)V99`, `X(10)` or `ZZ,ZZ9.99CR`.
///
/// Returns `None` for a malformed string: empty, an unknown symbol, or a
/// repetition count that is missing, zero or unclosed, or a total size
/// that does not fit in a `u32`.
pub fn analyze_picture(text: &str) -> Option<Picture> {
    let chars: Vec<char> = text.to_ascii_uppercase().chars().collect();
    if chars.is_empty() {
        return None;
    }

    let mut size = 0u32;
    let mut digits = 0u32;
    let mut scale = 0u32;
    let mut signed = false;
    let mut after_point = false;
    let (mut nines, mut alpha, mut any, mut national, mut boolean) = (false, false, false, false, false);
    let (mut numeric_edit, mut insertion) = (false, false);

    let mut i = 0;
    while i < chars.len() {
        let symbol = chars[i];
        i += 1;

        if (symbol == 'C' && chars.get(i) == Some(&'R')) || (symbol == 'D' && chars.get(i) == Some(&'B')) {
            i += 1;
            grow(&mut size, 2)?;
            numeric_edit = true;
            continue;
        }

        let mut count = 1u32;
        if chars.get(i) == Some(&'(') {
            let close = i + chars[i..].iter().position(|c| *c == ')')?;
            let digits_text: String = chars[i + 1..close].iter().collect();
            count = digits_text.parse().ok().filter(|n| *n > 0)?;
            i = close + 1;
        }

        match symbol {
            '9' => {
                nines = true;
                grow(&mut size, count)?;
                grow(&mut digits, count)?;
                if after_point {
                    grow(&mut scale, count)?;
                }
            }
            'P' => {
                nines = true;
                grow(&mut digits, count)?;
                if after_point {
                    grow(&mut scale, count)?;
                }
            }
            'X' => {
                any = true;
                grow(&mut size, count)?;
            }
            'A' => {
                alpha = true;
                grow(&mut size, count)?;
            }
            'N' => {
                national = true;
                grow(&mut size, count)?;
            }
            '1' => {
                boolean = true;
                grow(&mut size, count)?;
            }
            'S' => signed = true,
            'V' => after_point = true,
            'Z' | '*' | '+' | '-' | '$' | ',' => {
                numeric_edit = true;
                grow(&mut size, count)?;
            }
            '.' => {
                numeric_edit = true;
                after_point = true;
                grow(&mut size, count)?;
            }
            'B' | '0' | '/' => {
                insertion = true;
                grow(&mut size, count)?;
            }
            _ => return None,
        }
    }

    let category = if national {
        PictureCategory::National
    } else if boolean {
        PictureCategory::Boolean
    } else if numeric_edit {
        PictureCategory::NumericEdited
    } else if any || (alpha && nines) {
        if insertion {
            PictureCategory::AlphanumericEdited
        } else {
            PictureCategory::Alphanumeric
        }
    } else if alpha {
        if insertion {
            PictureCategory::AlphanumericEdited
        } else {
            PictureCategory::Alphabetic
        }
    } else if insertion {
        PictureCategory::NumericEdited
    } else {
        PictureCategory::Numeric
    };

    Some(Picture {
        text: text.to_string(),
        size,
        digits,
        scale,
        signed,
        category,
    })
}

/// Add `count` symbol positions to a running total.
fn grow(total: &mut u32, count: u32) -> Option<()> {
    *total = total.checked_add(count)?;
    Some(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric_with_scale() {
        let pic = analyze_picture("S9(5)V99").unwrap();
        assert_eq!((pic.size, pic.digits, pic.scale), (7, 7, 2));
        assert!(pic.signed);
        assert_eq!(pic.category, PictureCategory::Numeric);
    }

    #[test]
    fn test_alphanumeric_repetition() {
        let pic = analyze_picture("x(10)").unwrap();
        assert_eq!(pic.size, 10);
        assert_eq!(pic.category, PictureCategory::Alphanumeric);
        assert_eq!(analyze_picture("AAA").unwrap().category, PictureCategory::Alphabetic);
        assert_eq!(analyze_picture("XXBXX").unwrap().category, PictureCategory::AlphanumericEdited);
    }

    #[test]
    fn test_numeric_edited() {
        let pic = analyze_picture("ZZ,ZZ9.99CR").unwrap();
        assert_eq!(pic.size, 11);
        assert_eq!(pic.scale, 2);
        assert_eq!(pic.category, PictureCategory::NumericEdited);
        assert_eq!(analyze_picture("99/99/99").unwrap().category, PictureCategory::NumericEdited);
    }

    #[test]
    fn test_scaling_positions_take_no_storage() {
        let pic = analyze_picture("99PPP").unwrap();
        assert_eq!((pic.size, pic.digits), (2, 5));
    }

    #[test]
    fn test_national_and_boolean() {
        assert_eq!(analyze_picture("N(4)").unwrap().category, PictureCategory::National);
        let pic = analyze_picture("1(8)").unwrap();
        assert_eq!((pic.size, pic.category), (8, PictureCategory::Boolean));
    }

    #[test]
    fn test_malformed() {
        assert!(analyze_picture("").is_none());
        assert!(analyze_picture("X(").is_none());
        assert!(analyze_picture("X(0)").is_none());
        assert!(analyze_picture("9(A)").is_none());
        assert!(analyze_picture("Q9").is_none());
    }

    #[test]
    fn test_oversized_total() {
        assert!(analyze_picture("X(4000000000)X(4000000000)").is_none());
        assert!(analyze_picture("9(4294967295)9").is_none());
        assert!(analyze_picture("X(99999999999)").is_none());
        assert_eq!(analyze_picture("X(4294967295)").unwrap().size, u32::MAX);
    }
}
