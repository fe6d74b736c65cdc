//! UPS status flags encoded as a bitmask.
//!
//! The STATUS field may carry several flags at once, e.g.
//! `ONBATT LOWBATT`. Each known flag contributes `2^bit`.

use super::Conversion;

/// Baseline status. Recognized, but sets no bit.
pub const STATUS_ONLINE: &str = "ONLINE";

/// Known status flags and their bit positions.
///
/// `COMMLOST` is deliberately missing: lost communication reads as zero.
pub const STATUS_BITS: &[(&str, u32)] = &[
    ("ONBATT", 1),
    ("CAL", 2),
    ("TRIM", 3),
    ("BOOST", 4),
    ("OVERLOAD", 5),
    ("LOWBATT", 6),
    ("REPLACEBATT", 7),
    ("NOBATT", 8),
    ("SLAVE", 9),
    ("SLAVEDOWN", 10),
    ("SHUTTING DOWN", 11),
];

/// Looks up the bit position of a status flag.
pub fn status_bit(token: &str) -> Option<u32> {
    STATUS_BITS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|&(_, bit)| bit)
}

/// Converts a STATUS value to the sum of `2^bit` over its flags.
///
/// Tokens are split on single spaces and every occurrence counts, so a
/// repeated flag adds its bit twice. A token that is unknown on its own is
/// retried joined with the next one, so `SHUTTING DOWN` still matches.
pub fn convert_status(raw: &str) -> Conversion {
    let tokens: Vec<&str> = raw.trim().split(' ').map(str::trim).collect();

    let mut recognized = false;
    let mut sum = 0.0f64;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];
        if token == STATUS_ONLINE {
            recognized = true;
        } else if let Some(bit) = status_bit(token) {
            recognized = true;
            sum += f64::from(1u32 << bit);
        } else if let Some(bit) = tokens
            .get(i + 1)
            .and_then(|next| status_bit(&format!("{token} {next}")))
        {
            // Splitting alone never matches this flag upstream.
            recognized = true;
            sum += f64::from(1u32 << bit);
            i += 1;
        }
        i += 1;
    }

    if recognized {
        Conversion::Parsed(sum)
    } else {
        Conversion::Defaulted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_flags() {
        assert_eq!(convert_status("ONLINE"), Conversion::Parsed(0.0));
        assert_eq!(convert_status("ONBATT"), Conversion::Parsed(2.0));
        assert_eq!(convert_status("LOWBATT"), Conversion::Parsed(64.0));
    }

    #[test]
    fn test_flags_are_additive() {
        assert_eq!(convert_status("ONBATT LOWBATT"), Conversion::Parsed(66.0));
        assert_eq!(convert_status("ONLINE REPLACEBATT"), Conversion::Parsed(128.0));
    }

    #[test]
    fn test_repeated_flag_counts_twice() {
        assert_eq!(convert_status("ONBATT ONBATT"), Conversion::Parsed(4.0));
        assert_eq!(
            convert_status("LOWBATT ONBATT LOWBATT"),
            Conversion::Parsed(2.0 + 64.0 + 64.0)
        );
    }

    #[test]
    fn test_padding_is_ignored() {
        assert_eq!(convert_status("  ONBATT LOWBATT  "), Conversion::Parsed(66.0));
    }

    #[test]
    fn test_two_word_flag() {
        assert_eq!(convert_status("SHUTTING DOWN"), Conversion::Parsed(2048.0));
        assert_eq!(
            convert_status("ONBATT SHUTTING DOWN"),
            Conversion::Parsed(2.0 + 2048.0)
        );
    }

    #[test]
    fn test_unknown_tokens_read_as_zero() {
        assert_eq!(convert_status("COMMLOST"), Conversion::Defaulted);
        assert_eq!(convert_status("COMMLOST").value(), 0.0);
        assert_eq!(convert_status(""), Conversion::Defaulted);
        assert_eq!(convert_status("ONBATT BOGUS"), Conversion::Parsed(2.0));
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            flags in proptest::sample::subsequence(
                STATUS_BITS
                    .iter()
                    .filter(|(name, _)| !name.contains(' '))
                    .copied()
                    .collect::<Vec<_>>(),
                1..6,
            ),
            seed in any::<u64>(),
        ) {
            let expected: u32 = flags.iter().map(|&(_, bit)| 1u32 << bit).sum();

            let mut names: Vec<&str> = flags.iter().map(|&(name, _)| name).collect();
            let forward = convert_status(&names.join(" "));
            let shift = (seed as usize) % names.len();
            names.rotate_left(shift);
            names.reverse();
            let shuffled = convert_status(&names.join(" "));

            prop_assert_eq!(forward, Conversion::Parsed(f64::from(expected)));
            prop_assert_eq!(shuffled, forward);
        }
    }
}
