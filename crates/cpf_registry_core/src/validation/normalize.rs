//! Identifier normalization.

/// Keeps only ASCII decimal digits from `raw`, preserving their order.
///
/// Total function: formatting such as `111.444.777-35` becomes
/// `11144477735`, and input without digits becomes an empty string.
/// Length and content are validated later by [`super::cpf::validate_cpf`].
#[must_use]
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::normalize;

    #[test]
    fn strips_punctuation_from_formatted_cpf() {
        assert_eq!(normalize("111.444.777-35"), "11144477735");
    }

    #[test]
    fn keeps_digit_only_input_unchanged() {
        assert_eq!(normalize("52998224725"), "52998224725");
    }

    #[test]
    fn drops_non_ascii_digits_and_whitespace() {
        // Arabic-Indic and full-width digits are not ASCII digits.
        assert_eq!(normalize(" 1\u{0663}2\u{FF13}3\t"), "123");
    }

    #[test]
    fn returns_empty_string_when_no_digits() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("abc.-/"), "");
    }

    #[test]
    fn output_is_digit_only_ordered_subsequence_of_input() {
        let samples = [
            "a1b2c3",
            "000.000.000-00",
            "cpf: 529.982.247-25 (titular)",
            "9-8-7-6",
            "\u{00e9}1\u{00e9}",
        ];

        for sample in samples {
            let normalized = normalize(sample);
            assert!(normalized.chars().all(|ch| ch.is_ascii_digit()));

            let mut remaining = sample.chars();
            for ch in normalized.chars() {
                assert!(
                    remaining.any(|candidate| candidate == ch),
                    "`{normalized}` is not an ordered subsequence of `{sample}`"
                );
            }
        }
    }
}
