//! Positional mode-string parsing.

use super::types::{ModeChange, ModeTable};

/// Decode a mode string and its arguments into ordered changes.
///
/// Flags are scanned left to right; each flag that takes an argument in its
/// current direction consumes the next unused entry of `args`, wherever it
/// sits in the string (`+kl pw 10` and `+lk 10 pw` decode the same).
/// A string without a leading sign is read as `+`. Parsing never fails:
/// a flag whose argument is missing gets `None`, and surplus arguments are
/// ignored.
///
/// # Example
///
/// ```
/// use slirc_wire::mode::{parse_mode_changes, ModeTable};
///
/// let changes = parse_mode_changes("+o-v", &["alice", "bob"], &ModeTable::default());
/// assert_eq!(changes.len(), 2);
/// assert!(changes[0].adding);
/// assert_eq!(changes[1].arg.as_deref(), Some("bob"));
/// ```
pub fn parse_mode_changes<S: AsRef<str>>(
    modes: &str,
    args: &[S],
    table: &ModeTable,
) -> Vec<ModeChange> {
    let mut changes = Vec::with_capacity(modes.len());
    let mut args = args.iter().map(AsRef::as_ref);
    let mut adding = true;

    for c in modes.chars() {
        match c {
            '+' => adding = true,
            '-' => adding = false,
            flag => {
                let arg = if table.takes_arg(flag, adding) {
                    args.next().map(str::to_owned)
                } else {
                    None
                };
                changes.push(ModeChange::new(adding, flag, arg));
            }
        }
    }

    changes
}

/// Decode a user mode string such as `+iw-x`. User modes take no arguments.
pub fn parse_user_mode_changes(modes: &str) -> Vec<ModeChange> {
    let mut adding = true;
    modes
        .chars()
        .filter_map(|c| match c {
            '+' => {
                adding = true;
                None
            }
            '-' => {
                adding = false;
                None
            }
            flag => Some(ModeChange::new(adding, flag, None)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(adding: bool, flag: char, arg: Option<&str>) -> ModeChange {
        ModeChange::new(adding, flag, arg.map(str::to_owned))
    }

    #[test]
    fn test_args_follow_scan_order() {
        let table = ModeTable::default();
        let a = parse_mode_changes("+lk", &["10", "pw"], &table);
        assert_eq!(
            a,
            vec![change(true, 'l', Some("10")), change(true, 'k', Some("pw"))]
        );

        let b = parse_mode_changes("+kl", &["pw", "10"], &table);
        assert_eq!(
            b,
            vec![change(true, 'k', Some("pw")), change(true, 'l', Some("10"))]
        );
    }

    #[test]
    fn test_mixed_signs_and_argless_flags() {
        let table = ModeTable::default();
        let changes = parse_mode_changes("+mo-v+l", &["A", "B", "5"], &table);
        assert_eq!(
            changes,
            vec![
                change(true, 'm', None),
                change(true, 'o', Some("A")),
                change(false, 'v', Some("B")),
                change(true, 'l', Some("5")),
            ]
        );
    }

    #[test]
    fn test_unset_limit_consumes_nothing() {
        let table = ModeTable::default();
        let changes = parse_mode_changes("-l+o", &["A"], &table);
        assert_eq!(changes, vec![change(false, 'l', None), change(true, 'o', Some("A"))]);
    }

    #[test]
    fn test_unset_key_argument_is_optional() {
        let table = ModeTable::default();
        assert_eq!(
            parse_mode_changes::<&str>("-k", &[], &table),
            vec![change(false, 'k', None)]
        );
        assert_eq!(
            parse_mode_changes("-k", &["secret"], &table),
            vec![change(false, 'k', Some("secret"))]
        );
    }

    #[test]
    fn test_unknown_flags_take_no_argument() {
        let table = ModeTable::default();
        let changes = parse_mode_changes("+Xo", &["A"], &table);
        assert_eq!(changes, vec![change(true, 'X', None), change(true, 'o', Some("A"))]);
    }

    #[test]
    fn test_ban_list_query_without_mask() {
        let table = ModeTable::default();
        assert_eq!(
            parse_mode_changes::<String>("+b", &[], &table),
            vec![change(true, 'b', None)]
        );
    }

    #[test]
    fn test_missing_prefix_reads_as_plus() {
        let table = ModeTable::default();
        assert_eq!(
            parse_mode_changes::<&str>("nt", &[], &table),
            vec![change(true, 'n', None), change(true, 't', None)]
        );
    }

    #[test]
    fn test_user_modes() {
        assert_eq!(
            parse_user_mode_changes("+iw-x"),
            vec![change(true, 'i', None), change(true, 'w', None), change(false, 'x', None)]
        );
    }
}
