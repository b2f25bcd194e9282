//! Help, version and license texts.
use crate::core::options::OptionSet;
use crate::types::{OptionKind, ProgramInfo};

/// Column where option descriptions start.
const FLAG_WIDTH: usize = 40;

pub fn render_help(program: &ProgramInfo, options: &OptionSet) -> String {
    let mut out = String::from("\n");
    out.push_str(&format!("{} {}\n", program.name, program.version));
    out.push_str(&format!("{}\n", program.purpose));

    let mut prefix = "Usage:";
    for line in program.usage.trim().lines() {
        out.push_str(&format!("{} {}\n", prefix, line.trim()));
        prefix = "      ";
    }

    let indent = format!("\n {}", " ".repeat(FLAG_WIDTH));
    for decl in options.iter() {
        let (short_suffix, long_suffix) = match decl.kind {
            OptionKind::Boolean => (", ", ""),
            OptionKind::Value => (" VALUE, ", " VALUE"),
            OptionKind::Multiple => (" VALUE(S), ", " VALUE(S)"),
        };
        let short = decl
            .short
            .map(|c| format!("-{}{}", c, short_suffix))
            .unwrap_or_default();
        let flag = format!("    {}--{}{}", short, decl.long, long_suffix);
        let description = decl.description.replace('\n', &indent);
        out.push_str(&format!("{} {}\n", fit(&flag, FLAG_WIDTH), description));
    }
    out.push('\n');

    if let Some(config) = &program.config {
        out.push_str(&format!("See {} for default values\n\n", config));
    }
    if let Some(url) = &program.url {
        out.push_str(&format!("{}\n\n", url));
    }
    out
}

pub fn render_version(program: &ProgramInfo) -> String {
    format!("\n{} {} {}\n\n", program.name, program.version, program.date)
}

pub fn render_license(program: &ProgramInfo) -> String {
    let mut out = format!(
        "\n{} {}\n\n{}\n\n",
        program.name, program.version, program.copyright
    );
    if let Some(license) = &program.license {
        out.push_str(&format!("{}\n\n", license));
    }
    out
}

/// Pad with spaces or truncate to exactly `width` characters.
pub(crate) fn fit(text: &str, width: usize) -> String {
    let mut s: String = text.chars().take(width).collect();
    let len = s.chars().count();
    s.extend(std::iter::repeat_n(' ', width - len));
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionDecl;

    fn program() -> ProgramInfo {
        ProgramInfo {
            name: "Example".into(),
            version: "1.2.3".into(),
            date: "01/02/2024".into(),
            purpose: "Says hello.".into(),
            url: Some("https://example.com/".into()),
            copyright: "Copyright (c) 2024".into(),
            license: Some("Free to use.".into()),
            usage: "example --greeting G --name N\nexample --help".into(),
            config: Some("example.ini".into()),
            ..Default::default()
        }
    }

    #[test]
    fn help_lists_every_option() {
        let options = OptionSet::with_reserved(vec![
            OptionDecl::value("greeting", 'g', "A greeting"),
            OptionDecl::multiple("files", None, "Input files\nglobs allowed"),
        ])
        .unwrap();
        let help = render_help(&program(), &options);
        let lines: Vec<&str> = help.lines().collect();

        assert_eq!(lines[0], "");
        assert_eq!(lines[1], "Example 1.2.3");
        assert_eq!(lines[2], "Says hello.");
        assert_eq!(lines[3], "Usage: example --greeting G --name N");
        assert_eq!(lines[4], "       example --help");
        assert_eq!(lines[5], format!("{} Show help information", fit("    -h, --help", 40)));
        assert_eq!(
            lines[10],
            format!("{} A greeting", fit("    -g VALUE, --greeting VALUE", 40))
        );
        assert_eq!(lines[11], format!("{} Input files", fit("    --files VALUE(S)", 40)));
        assert_eq!(lines[12], format!("{}globs allowed", " ".repeat(41)));
        assert!(help.contains("\nSee example.ini for default values\n\nhttps://example.com/\n\n"));
    }

    #[test]
    fn long_flags_are_truncated() {
        assert_eq!(fit("abcdef", 4), "abcd");
        assert_eq!(fit("ab", 4), "ab  ");
    }

    #[test]
    fn version_and_license() {
        assert_eq!(render_version(&program()), "\nExample 1.2.3 01/02/2024\n\n");
        assert_eq!(
            render_license(&program()),
            "\nExample 1.2.3\n\nCopyright (c) 2024\n\nFree to use.\n\n"
        );
    }
}
