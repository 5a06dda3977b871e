//! Raw message decoding into [`EmailRecord`]s

use crate::dates::parse_received_date;
use crate::error::{Error, Result};
use crate::types::EmailRecord;
use mailparse::{DispositionType, MailHeader, ParsedMail};
use tracing::debug;

/// Parse raw RFC 822 bytes into an [`EmailRecord`].
///
/// The longest plain-text and HTML parts are kept; attachments are skipped.
/// A missing or unparseable `Date` header leaves the received date empty.
pub fn parse_message(raw: &[u8]) -> Result<EmailRecord> {
    let parsed = mailparse::parse_mail(raw).map_err(|e| Error::Structure(e.to_string()))?;

    let from = header_value(&parsed.headers, "from")
        .ok_or_else(|| Error::MissingHeader("From".into()))?;
    let subject = header_value(&parsed.headers, "subject").unwrap_or_default();
    let date = header_value(&parsed.headers, "date").and_then(|v| parse_received_date(&v));

    let (text, html) = extract_body_parts(&parsed);

    debug!("Parsed message {subject:?} from {from}");

    Ok(EmailRecord::new(from, subject, date, text, html))
}

fn header_value(headers: &[MailHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case(name))
        .map(MailHeader::get_value)
}

fn extract_body_parts(parsed: &ParsedMail) -> (String, Option<String>) {
    let mut text = String::new();
    let mut html: Option<String> = None;
    collect_parts(parsed, &mut text, &mut html);
    (text, html)
}

fn collect_parts(part: &ParsedMail, text: &mut String, html: &mut Option<String>) {
    if !part.subparts.is_empty() {
        for sub in &part.subparts {
            collect_parts(sub, text, html);
        }
        return;
    }

    if part.get_content_disposition().disposition == DispositionType::Attachment {
        return;
    }

    let content_type = part.ctype.mimetype.to_lowercase();
    let Ok(body) = part.get_body() else {
        return;
    };

    if content_type.contains("text/html") {
        if html.as_ref().is_none_or(|current| body.len() > current.len()) {
            *html = Some(body);
        }
    } else if content_type.contains("text/plain") && body.len() > text.len() {
        *text = body;
    }
}

const BLOCK_TAGS: &[&str] = &[
    "br", "p", "div", "li", "tr", "table", "h1", "h2", "h3", "h4", "h5", "h6",
];

/// Strip tags from an HTML body, keeping one line per block element.
///
/// Script and style content is dropped and common entities are decoded.
/// Adjacent table cells stay separated by a space.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    let mut in_script = false;
    let mut in_style = false;
    let mut tag_start_idx: usize = 0;

    let chars: Vec<char> = html.chars().collect();
    let lower_chars: Vec<char> = chars.iter().map(char::to_ascii_lowercase).collect();

    let mut i = 0;
    while i < chars.len() {
        if !in_tag && chars[i] == '<' {
            tag_start_idx = i;
            let remaining: String = lower_chars[i..chars.len().min(i + 9)].iter().collect();
            if remaining.starts_with("<script") {
                in_script = true;
            } else if remaining.starts_with("<style") {
                in_style = true;
            } else if remaining.starts_with("</script") {
                in_script = false;
            } else if remaining.starts_with("</style") {
                in_style = false;
            }
            in_tag = true;
        } else if in_tag && chars[i] == '>' {
            in_tag = false;
            let tag_name: String = lower_chars[tag_start_idx + 1..i]
                .iter()
                .skip_while(|c| **c == '/')
                .take_while(|c| c.is_ascii_alphanumeric())
                .collect();
            result.push(if BLOCK_TAGS.contains(&tag_name.as_str()) {
                '\n'
            } else {
                ' '
            });
        } else if !in_tag && !in_script && !in_style {
            result.push(chars[i]);
        }
        i += 1;
    }

    decode_entities(&result)
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(text: &str) -> String {
    let named = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&rarr;", "→");

    let mut out = String::with_capacity(named.len());
    let mut rest = named.as_str();
    while let Some(start) = rest.find("&#") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let decoded = after.find(';').and_then(|end| {
            let code = &after[..end];
            let value = code
                .strip_prefix(['x', 'X'])
                .map_or_else(|| code.parse().ok(), |hex| u32::from_str_radix(hex, 16).ok());
            value.and_then(char::from_u32).map(|c| (c, end))
        });
        if let Some((c, end)) = decoded {
            out.push(c);
            rest = &after[end + 1..];
        } else {
            out.push_str("&#");
            rest = after;
        }
    }
    out.push_str(rest);

    out.replace("&amp;", "&")
}

/// All readable text of a record: the plain body plus the stripped HTML body
#[must_use]
pub fn message_text(email: &EmailRecord) -> String {
    let html_text = email.html_body.as_deref().map(strip_html).unwrap_or_default();

    match (email.body.trim().is_empty(), html_text.is_empty()) {
        (true, _) => html_text,
        (false, true) => email.body.clone(),
        (false, false) => format!("{}\n{html_text}", email.body),
    }
}
