//! Command line normalizer and parser.
//!
//! Parsing runs in two passes. The first pass rewrites every flag into its
//! `--long` form: short letters are unbundled (`-qv` becomes `--quiet
//! --verbose`) and `--name=value` is split into `--name value`. Unknown flags
//! fail immediately. The second pass walks the normalized stream and assigns
//! values to whichever option is awaiting one.
use tracing::{debug, warn};

use crate::core::config::Configuration;
use crate::core::inputs::InputMap;
use crate::core::options::OptionSet;
use crate::error::{Error, Result};
use crate::types::{InputValue, OptionKind};

enum Token {
    Flag(String, OptionKind),
    Value(String),
}

/// Parse `args` (program name excluded) against `options`.
///
/// The returned map holds every configuration key, then every declared
/// option at its default, then the values given on the command line.
pub fn parse_arguments<S: AsRef<str>>(
    options: &OptionSet,
    defaults: &Configuration,
    args: &[S],
) -> Result<InputMap> {
    let mut inputs = InputMap::from_config(defaults);
    for decl in options.iter() {
        let default = defaults.get(&decl.long).unwrap_or("");
        let value = match decl.kind {
            OptionKind::Boolean => InputValue::Flag(false),
            OptionKind::Value => InputValue::Value(default.to_string()),
            OptionKind::Multiple if default.is_empty() => InputValue::Multiple(Vec::new()),
            OptionKind::Multiple => InputValue::Multiple(vec![default.to_string()]),
        };
        inputs.set(decl.long.clone(), value);
    }

    let (tokens, count) = normalize(options, args)?;
    assign(&mut inputs, tokens);
    inputs.set_count(count);

    debug!("Parsed {} recognized flag(s)", count);
    Ok(inputs)
}

fn normalize<S: AsRef<str>>(options: &OptionSet, args: &[S]) -> Result<(Vec<Token>, usize)> {
    let mut tokens = Vec::with_capacity(args.len());
    let mut count = 0;

    for arg in args {
        let arg = arg.as_ref();
        if let Some(long) = arg.strip_prefix("--") {
            let (name, inline) = match long.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (long, None),
            };
            let kind = options
                .kind(name)
                .ok_or_else(|| Error::UnknownArgument(name.to_string()))?;
            tokens.push(Token::Flag(name.to_string(), kind));
            if let Some(value) = inline {
                tokens.push(Token::Value(value.to_string()));
            }
            count += 1;
        } else if let Some(letters) = arg.strip_prefix('-') {
            for c in letters.chars() {
                let decl = options
                    .long_for(c)
                    .and_then(|long| options.get(long))
                    .ok_or_else(|| Error::UnknownArgument(c.to_string()))?;
                tokens.push(Token::Flag(decl.long.clone(), decl.kind));
                count += 1;
            }
        } else {
            tokens.push(Token::Value(arg.to_string()));
        }
    }

    Ok((tokens, count))
}

fn assign(inputs: &mut InputMap, tokens: Vec<Token>) {
    let mut awaiting: Option<(String, OptionKind)> = None;

    for token in tokens {
        match token {
            Token::Flag(name, OptionKind::Boolean) => {
                inputs.set(name, true);
                awaiting = None;
            }
            Token::Flag(name, OptionKind::Value) => awaiting = Some((name, OptionKind::Value)),
            Token::Flag(name, OptionKind::Multiple) => {
                inputs.set(name.clone(), InputValue::Multiple(Vec::new()));
                awaiting = Some((name, OptionKind::Multiple));
            }
            Token::Value(value) => match &awaiting {
                Some((name, OptionKind::Value)) => inputs.set(name.clone(), value),
                Some((name, OptionKind::Multiple)) => {
                    if let Some(InputValue::Multiple(list)) = inputs.get_mut(name) {
                        list.push(value);
                    }
                }
                _ => warn!("Ignoring argument with no option awaiting a value: {:?}", value),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionDecl;

    fn options() -> OptionSet {
        OptionSet::with_reserved(vec![
            OptionDecl::value("greeting", 'g', "A greeting"),
            OptionDecl::value("name", 'n', "A name"),
            OptionDecl::multiple("files", 'f', "Input files"),
        ])
        .unwrap()
    }

    fn parse(args: &[&str]) -> Result<InputMap> {
        parse_arguments(&options(), &Configuration::empty(), args)
    }

    #[test]
    fn empty_args_yield_defaults() {
        let conf = Configuration::parse("[d]\nname = World\nfiles = a.txt\n", "d.ini").unwrap();
        let inputs = parse_arguments::<&str>(&options(), &conf, &[]).unwrap();

        assert!(!inputs.flag("help"));
        assert!(!inputs.flag("verbose"));
        assert_eq!(inputs.value("greeting"), "");
        assert_eq!(inputs.value("name"), "World");
        assert_eq!(inputs.values("files"), ["a.txt"]);
        assert_eq!(inputs.count(), 0);
    }

    #[test]
    fn empty_multiple_default_is_empty_list() {
        let inputs = parse(&[]).unwrap();
        assert_eq!(inputs.get("files"), Some(&InputValue::Multiple(Vec::new())));
    }

    #[test]
    fn inline_and_separate_values_match() {
        let a = parse(&["--greeting=Hello"]).unwrap();
        let b = parse(&["--greeting", "Hello"]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.value("greeting"), "Hello");
    }

    #[test]
    fn inline_value_keeps_everything_after_first_equals() {
        let inputs = parse(&["--name=a=b"]).unwrap();
        assert_eq!(inputs.value("name"), "a=b");
    }

    #[test]
    fn bundled_short_flags_match_separate_ones() {
        let a = parse(&["-qv"]).unwrap();
        let b = parse(&["-q", "-v"]).unwrap();
        assert_eq!(a, b);
        assert!(a.flag("quiet") && a.flag("verbose"));
        assert_eq!(a.count(), 2);
    }

    #[test]
    fn short_value_flag_takes_next_token() {
        let inputs = parse(&["-g", "Hi", "-n", "There"]).unwrap();
        assert_eq!(inputs.value("greeting"), "Hi");
        assert_eq!(inputs.value("name"), "There");
    }

    #[test]
    fn unknown_flags_fail_anywhere() {
        for args in [
            vec!["--bogus"],
            vec!["--name", "x", "--bogus=1"],
            vec!["-x"],
            vec!["-qx", "--name", "x"],
            vec!["--name", "x", "-z"],
        ] {
            let err = parse(&args).unwrap_err();
            assert!(matches!(err, Error::UnknownArgument(_)), "{args:?}");
        }
        assert_eq!(parse(&["-qz"]).unwrap_err().to_string(), "Unknown argument: z");
        assert_eq!(parse(&["--nope=1"]).unwrap_err().to_string(), "Unknown argument: nope");
    }

    #[test]
    fn last_value_wins() {
        let inputs = parse(&["--name", "a", "--name", "b"]).unwrap();
        assert_eq!(inputs.value("name"), "b");

        let inputs = parse(&["--name", "a", "b"]).unwrap();
        assert_eq!(inputs.value("name"), "b");
    }

    #[test]
    fn multiple_collects_and_resets_default() {
        let conf = Configuration::parse("[d]\nfiles = default.txt\n", "d.ini").unwrap();
        let inputs = parse_arguments(&options(), &conf, &["--files", "a", "b", "-f", "c"]).unwrap();
        assert_eq!(inputs.values("files"), ["c"]);

        let inputs = parse_arguments(&options(), &conf, &["--files", "a", "b"]).unwrap();
        assert_eq!(inputs.values("files"), ["a", "b"]);
    }

    #[test]
    fn boolean_flag_ends_value_collection() {
        let inputs = parse(&["--files", "a", "-q", "b"]).unwrap();
        assert_eq!(inputs.values("files"), ["a"]);
        assert!(inputs.flag("quiet"));
    }

    #[test]
    fn stray_positional_is_dropped() {
        let inputs = parse(&["stray", "--name", "x"]).unwrap();
        assert_eq!(inputs.value("name"), "x");
        assert!(!inputs.iter().any(|(_, v)| v.as_str() == Some("stray")));
    }

    #[test]
    fn config_only_keys_are_kept() {
        let conf = Configuration::parse("[d]\nexample = 1\n", "d.ini").unwrap();
        let inputs = parse_arguments::<&str>(&options(), &conf, &[]).unwrap();
        assert_eq!(inputs.value("example"), "1");
    }
}
