//! Timestamp format catalog
//!
//! An ordered list of the timestamp layouts commonly found in log files. Each
//! entry names the grok pattern that extracts it and the date format
//! string(s) that parse it. Entries are ordered from most to least specific,
//! so that for example `2018-05-24 17:28:31,735` is reported with its
//! millisecond layout rather than as a bare date and time followed by
//! trailing text.
//!
//! Two values share a *format family* when their first full match is the
//! same catalog entry. Entries can share a grok pattern name and still be
//! different families.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::value::Value;

// Grok-style building blocks
const YEAR: &str = r"\d{4}";
const MONTHNUM: &str = r"(?:0?[1-9]|1[0-2])";
const MONTHNUM2: &str = r"(?:0[1-9]|1[0-2])";
const MONTHDAY: &str = r"(?:0[1-9]|[12][0-9]|3[01]|[1-9])";
const MONTHDAY2: &str = r"(?:0[1-9]|[12][0-9]|3[01])";
const HOUR: &str = r"(?:2[0-3]|[01]?[0-9])";
const HOUR2: &str = r"(?:2[0-3]|[01][0-9])";
const MINUTE: &str = r"[0-5][0-9]";
const SECOND: &str = r"(?:[0-5][0-9]|60)";
const FRACTION: &str = r",[0-9]{3}";
const MONTH: &str = r"(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";
const DAY: &str = r"(?:Mon(?:day)?|Tue(?:sday)?|Wed(?:nesday)?|Thu(?:rsday)?|Fri(?:day)?|Sat(?:urday)?|Sun(?:day)?)";
const TZ_NAME: &str = r"(?:[APMCE][SD]T|UTC|GMT)";
const OFFSET: &str = r"[+-](?:2[0-3]|[01][0-9])[0-5][0-9]";
const COLON_OFFSET: &str = r"[+-](?:2[0-3]|[01][0-9]):[0-5][0-9]";

/// A known timestamp layout
#[derive(Debug)]
pub struct TimestampFormat {
    index: usize,
    grok_pattern_name: &'static str,
    date_formats: &'static [&'static str],
    search: Regex,
    full: Regex,
}

impl TimestampFormat {
    fn new(
        index: usize,
        grok_pattern_name: &'static str,
        date_formats: &'static [&'static str],
        body: &str,
    ) -> Self {
        Self {
            index,
            grok_pattern_name,
            date_formats,
            search: Regex::new(&format!(r"\b(?:{body})\b")).expect("valid timestamp pattern"),
            full: Regex::new(&format!(r"^(?:{body})$")).expect("valid timestamp pattern"),
        }
    }

    /// Position of this entry in the catalog
    pub fn index(&self) -> usize {
        self.index
    }

    /// Name of the grok pattern that extracts this layout
    pub fn grok_pattern_name(&self) -> &'static str {
        self.grok_pattern_name
    }

    /// Date format renderings, canonical rendering first
    pub fn date_formats(&self) -> &'static [&'static str] {
        self.date_formats
    }

    fn captures_to_match<'t>(
        &self,
        text: &'t str,
        caps: regex::Captures<'t>,
    ) -> Option<CatalogMatch<'t>> {
        let whole = caps.get(0)?;
        Some(CatalogMatch {
            candidate_index: self.index,
            span: whole.range(),
            preface: &text[..whole.start()],
            matched: whole.as_str(),
            epilogue: &text[whole.end()..],
            grok_pattern_name: self.grok_pattern_name,
            date_formats: self.date_formats,
            has_timezone: caps.name("tz").is_some(),
        })
    }
}

/// A timestamp found by the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogMatch<'t> {
    /// Index of the matching catalog entry
    pub candidate_index: usize,
    /// Byte range of the timestamp within the searched text
    pub span: Range<usize>,
    /// Text before the timestamp
    pub preface: &'t str,
    /// The timestamp itself
    pub matched: &'t str,
    /// Text after the timestamp
    pub epilogue: &'t str,
    pub grok_pattern_name: &'static str,
    pub date_formats: &'static [&'static str],
    /// Whether the matched text carries a zone or UTC offset
    pub has_timezone: bool,
}

impl CatalogMatch<'_> {
    /// Whether both matches come from the same catalog entry
    pub fn same_family(&self, other: &CatalogMatch<'_>) -> bool {
        self.candidate_index == other.candidate_index
    }
}

static CATALOG: Lazy<Vec<TimestampFormat>> = Lazy::new(|| {
    let date = format!("{YEAR}-{MONTHNUM2}-{MONTHDAY2}");
    let time = format!("{HOUR2}:{MINUTE}:{SECOND}");
    let loose_time = format!("{HOUR}:{MINUTE}:{SECOND}");

    fn entry(
        grok_pattern_name: &'static str,
        date_formats: &'static [&'static str],
        body: String,
    ) -> (&'static str, &'static [&'static str], String) {
        (grok_pattern_name, date_formats, body)
    }

    let definitions = vec![
        // Must precede the ISO8601 entries, which would otherwise stop
        // before the space-separated zone
        entry(
            "TOMCAT_DATESTAMP",
            &["YYYY-MM-dd HH:mm:ss,SSS Z"],
            format!("{date} {time}{FRACTION} (?P<tz>Z|{OFFSET})"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["YYYY-MM-dd HH:mm:ss,SSSZ"],
            format!("{date} {time}{FRACTION}(?P<tz>Z|{OFFSET})"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["YYYY-MM-dd HH:mm:ss,SSSZZ"],
            format!("{date} {time}{FRACTION}(?P<tz>{COLON_OFFSET})"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["YYYY-MM-dd HH:mm:ss,SSS"],
            format!("{date} {time}{FRACTION}"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["YYYY-MM-dd HH:mm:ssZ"],
            format!("{date} {time}(?P<tz>Z|{OFFSET})"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["YYYY-MM-dd HH:mm:ssZZ"],
            format!("{date} {time}(?P<tz>{COLON_OFFSET})"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["YYYY-MM-dd HH:mm:ss"],
            format!("{date} {time}"),
        ),
        entry(
            "TIMESTAMP_ISO8601",
            &["ISO8601"],
            format!(
                r"{YEAR}-{MONTHNUM}-{MONTHDAY}[T ]{HOUR}:?{MINUTE}(?::?{SECOND}(?:[:.,][0-9]+)?)?(?P<tz>Z|[+-]{HOUR2}(?::?{MINUTE})?)?"
            ),
        ),
        entry(
            "DATESTAMP_RFC822",
            &["EEE MMM dd YYYY HH:mm:ss zzz", "EEE MMM d YYYY HH:mm:ss zzz"],
            format!("{DAY} {MONTH} {MONTHDAY} {YEAR} {time} (?P<tz>{TZ_NAME})"),
        ),
        entry(
            "DATESTAMP_RFC822",
            &["EEE MMM dd YYYY HH:mm zzz", "EEE MMM d YYYY HH:mm zzz"],
            format!("{DAY} {MONTH} {MONTHDAY} {YEAR} {HOUR2}:{MINUTE} (?P<tz>{TZ_NAME})"),
        ),
        entry(
            "DATESTAMP_RFC2822",
            &["EEE, dd MMM YYYY HH:mm:ss ZZ", "EEE, d MMM YYYY HH:mm:ss ZZ"],
            format!("{DAY}, {MONTHDAY} {MONTH} {YEAR} {time} (?P<tz>{COLON_OFFSET})"),
        ),
        entry(
            "DATESTAMP_RFC2822",
            &["EEE, dd MMM YYYY HH:mm:ss Z", "EEE, d MMM YYYY HH:mm:ss Z"],
            format!("{DAY}, {MONTHDAY} {MONTH} {YEAR} {time} (?P<tz>{OFFSET})"),
        ),
        entry(
            "DATESTAMP_OTHER",
            &["EEE MMM dd HH:mm:ss zzz YYYY", "EEE MMM d HH:mm:ss zzz YYYY"],
            format!("{DAY} {MONTH} +{MONTHDAY} {time} (?P<tz>{TZ_NAME}) {YEAR}"),
        ),
        entry(
            "DATESTAMP_EVENTLOG",
            &["YYYYMMddHHmmss"],
            format!("{YEAR}{MONTHNUM2}{MONTHDAY2}{HOUR2}{MINUTE}{SECOND}"),
        ),
        entry(
            "HTTPDERROR_DATE",
            &["EEE MMM dd HH:mm:ss YYYY", "EEE MMM d HH:mm:ss YYYY"],
            format!("{DAY} {MONTH} +{MONTHDAY} {time} {YEAR}"),
        ),
        entry(
            "SYSLOGTIMESTAMP",
            &["MMM dd HH:mm:ss.SSS", "MMM  d HH:mm:ss.SSS", "MMM d HH:mm:ss.SSS"],
            format!(r"{MONTH} +{MONTHDAY} {loose_time}\.[0-9]{{3}}"),
        ),
        entry(
            "SYSLOGTIMESTAMP",
            &["MMM dd HH:mm:ss", "MMM  d HH:mm:ss", "MMM d HH:mm:ss"],
            format!("{MONTH} +{MONTHDAY} {loose_time}"),
        ),
        entry(
            "HTTPDATE",
            &["dd/MMM/YYYY:HH:mm:ss Z"],
            format!("{MONTHDAY2}/{MONTH}/{YEAR}:{time} (?P<tz>{OFFSET})"),
        ),
        entry(
            "CATALINA_DATESTAMP",
            &["MMM dd, YYYY K:mm:ss a"],
            format!("{MONTH} {MONTHDAY}, {YEAR} {loose_time} (?:AM|PM)"),
        ),
        entry(
            "CISCOTIMESTAMP",
            &["MMM dd YYYY HH:mm:ss", "MMM  d YYYY HH:mm:ss"],
            format!("{MONTH} +{MONTHDAY} {YEAR} {time}"),
        ),
        entry("POSINT", &["UNIX_MS"], r"\d{13}".to_string()),
        entry("NUMBER", &["UNIX"], r"\d{10}\.(?:\d{3}){1,3}".to_string()),
        entry("POSINT", &["UNIX"], r"\d{10}".to_string()),
        entry("BASE16NUM", &["TAI64N"], r"[0-9A-Fa-f]{24}".to_string()),
    ];

    definitions
        .into_iter()
        .enumerate()
        .map(|(index, (grok, formats, body))| TimestampFormat::new(index, grok, formats, &body))
        .collect()
});

/// All catalog entries, most specific first
pub fn timestamp_formats() -> &'static [TimestampFormat] {
    &CATALOG
}

/// Find the first catalog entry matching anywhere in `text`
///
/// Matches must sit on word boundaries. The text around the timestamp is
/// returned as the preface and epilogue.
pub fn find_first_match(text: &str) -> Option<CatalogMatch<'_>> {
    CATALOG.iter().find_map(|format| {
        format
            .search
            .captures(text)
            .and_then(|caps| format.captures_to_match(text, caps))
    })
}

/// Find the first catalog entry matching the whole of `text`
pub fn find_first_full_match(text: &str) -> Option<CatalogMatch<'_>> {
    CATALOG.iter().find_map(|format| {
        format
            .full
            .captures(text)
            .and_then(|caps| format.captures_to_match(text, caps))
    })
}

/// Full catalog match of a scalar value
#[derive(Debug, Clone, Copy)]
pub struct ValueMatch {
    pub format: &'static TimestampFormat,
    pub has_timezone: bool,
}

/// Match a field value against the catalog
///
/// Only strings and numbers can hold timestamps; the value's whole textual
/// rendering must match.
pub fn full_match_value(value: &Value) -> Option<ValueMatch> {
    let text = match value {
        Value::String(_) | Value::Integer(_) | Value::Float(_) => value.as_text()?,
        _ => return None,
    };
    let found = find_first_full_match(&text)?;
    Some(ValueMatch {
        format: &CATALOG[found.candidate_index],
        has_timezone: found.has_timezone,
    })
}
