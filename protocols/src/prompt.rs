//! Screen classification and output cleanup for interactive device shells.

const PROMPT_MAX_LEN: usize = 64;
const PROMPT_SUFFIXES: &[char] = &['#', '>', '$'];
const AUTH_FAILURE_MARKERS: &[&str] = &[
    "authentication failed",
    "login incorrect",
    "access denied",
    "bad passwords",
];

/// What the device is waiting for, judged from the text received so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Password,
    Shell,
    AuthFailed,
    /// More output is expected.
    Pending,
}

pub fn classify(buffer: &str) -> Screen {
    let lower: String = buffer.to_ascii_lowercase();
    if AUTH_FAILURE_MARKERS.iter().any(|m| lower.contains(m)) {
        return Screen::AuthFailed;
    }

    let Some(last) = last_line(&lower) else {
        return Screen::Pending;
    };

    if last.ends_with("username:") || last.ends_with("login:") {
        Screen::Login
    } else if last.ends_with("password:") {
        Screen::Password
    } else if is_prompt_line(last) {
        Screen::Shell
    } else {
        Screen::Pending
    }
}

/// Like [`classify`], for what a device prints before anything was sent to it.
///
/// Login banners are often framed with rules such as `#####` or
/// `# Authorized access only #`, which would otherwise pass for a prompt.
pub fn classify_greeting(buffer: &str) -> Screen {
    match classify(buffer) {
        Screen::Shell if last_line(buffer).is_some_and(is_banner_rule) => Screen::Pending,
        screen => screen,
    }
}

fn is_banner_rule(line: &str) -> bool {
    let line: &str = line.trim();
    let only_rule_chars: bool = line
        .chars()
        .all(|c| c.is_whitespace() || PROMPT_SUFFIXES.contains(&c));
    let framed: bool = line.len() > 1
        && line.starts_with(PROMPT_SUFFIXES)
        && line.chars().next() == line.chars().last();
    only_rule_chars || framed
}

/// True when the last non-empty line of `buffer` is a shell prompt.
pub fn ends_with_prompt(buffer: &str) -> bool {
    last_line(buffer).is_some_and(is_prompt_line)
}

fn last_line(buffer: &str) -> Option<&str> {
    buffer.lines().map(str::trim_end).rfind(|l| !l.is_empty())
}

pub fn is_prompt_line(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().count() <= PROMPT_MAX_LEN && line.ends_with(PROMPT_SUFFIXES)
}

/// Removes ANSI escape sequences (`ESC [ ... final`).
pub fn strip_ansi(input: &str) -> String {
    let mut out: String = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\u{1b}' {
            out.push(c);
            continue;
        }
        if chars.peek() == Some(&'[') {
            chars.next();
            for next in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&next) {
                    break;
                }
            }
        }
    }

    out
}

/// Turns the raw text captured after sending `command` into the command's output:
/// line endings normalised, escape codes removed, the echoed command and the
/// trailing prompt dropped.
pub fn clean_output(raw: &str, command: &str) -> String {
    let text: String = strip_ansi(&raw.replace("\r\n", "\n")).replace('\r', "");
    let mut lines: Vec<&str> = text.lines().collect();

    if let Some(first) = lines.first()
        && first.trim_end().ends_with(command.trim())
    {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    if lines.last().is_some_and(|l| is_prompt_line(l)) {
        lines.pop();
    }

    lines.join("\n").trim_end().to_string()
}
