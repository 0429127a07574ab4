use crate::domain::{LinkMode, Port, PortState};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

// The switch renders its state as script source, not as a data format. The
// system info page carries one object literal with unquoted keys; the port
// statistics page carries a scalar and three comma-separated integer arrays.
static SYSTEM_INFO_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?ms)var info_ds = (\{.*?\});$").unwrap());
static BARE_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)([{,]\s*|^\s*)([A-Za-z_][A-Za-z0-9_]*)\s*:").unwrap());
static MAX_PORT_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"var max_port_num = (\d+);").unwrap());
static STATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)state:\[(.*?)\],").unwrap());
static LINK_STATUS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)link_status:\[(.*?)\],").unwrap());
static PKTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)pkts:\[(.*?)\]").unwrap());

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("pattern for '{0}' not found in page text")]
    PatternNotFound(&'static str),
    #[error("malformed literal: {0}")]
    MalformedLiteral(String),
    #[error("missing field '{0}'")]
    MissingField(String),
    #[error("index out of range: {0}")]
    IndexOutOfRange(String),
}

/// The decoded `info_ds` object. Values stay generic until a caller asks for
/// a concrete field; asking for a key the page did not carry (or carried as
/// something other than a string) reports the field by name.
#[derive(Debug)]
pub struct SystemInfoFields(serde_json::Map<String, Value>);

impl SystemInfoFields {
    pub fn get(&self, key: &str) -> Result<&str, ParseError> {
        self.0.get(key).and_then(Value::as_str).ok_or_else(|| ParseError::MissingField(key.to_owned()))
    }
}

/// Extracts the `var info_ds = { ... };` literal from the system info page.
///
/// Decoding is two-phased on purpose: the embedded literal is repaired into
/// valid JSON first (quoting the bare identifier keys), then decoded
/// strictly. A failure in the first phase points at the page layout, a
/// failure in the second at the literal's content.
pub fn extract_system_info(text: &str) -> Result<SystemInfoFields, ParseError> {
    let captures = SYSTEM_INFO_RE.captures(text).ok_or(ParseError::PatternNotFound("info_ds"))?;
    let repaired = BARE_KEY_RE.replace_all(&captures[1], "${1}\"${2}\":");

    let fields = serde_json::from_str::<serde_json::Map<String, Value>>(&repaired)
        .map_err(|e| ParseError::MalformedLiteral(format!("info_ds: {e}")))?;
    Ok(SystemInfoFields(fields))
}

/// Extracts the per-port records from the port statistics page.
///
/// The page stores counters as one flat array with four consecutive entries
/// per port, so port N's counters live at offset `4 * (N - 1)`. The returned
/// order, port 1 first, is the authoritative port order for the device.
pub fn extract_ports_info(text: &str) -> Result<Vec<Port>, ParseError> {
    let port_count = capture(&MAX_PORT_NUM_RE, "max_port_num", text)?
        .parse::<usize>()
        .map_err(|e| ParseError::MalformedLiteral(format!("max_port_num: {e}")))?;
    let states = int_array(capture(&STATE_RE, "state", text)?, "state")?;
    let link_codes = int_array(capture(&LINK_STATUS_RE, "link_status", text)?, "link_status")?;
    let pkts = int_array(capture(&PKTS_RE, "pkts", text)?, "pkts")?;

    (0..port_count)
        .map(|index| {
            let state_code = entry(&states, "state", index)?;
            let link_code = entry(&link_codes, "link_status", index)?;

            Ok(Port {
                port_num: (index + 1) as u16,
                state: PortState::from_code(state_code)
                    .ok_or_else(|| ParseError::IndexOutOfRange(format!("state[{index}] is {state_code}, expected 0 or 1")))?,
                link_status: LinkMode::from_code(link_code)
                    .ok_or_else(|| ParseError::IndexOutOfRange(format!("link_status[{index}] is {link_code}, expected 0..=7")))?,
                txgoodpkt: entry(&pkts, "pkts", 4 * index)?,
                txbadpkt: entry(&pkts, "pkts", 4 * index + 1)?,
                rxgoodpkt: entry(&pkts, "pkts", 4 * index + 2)?,
                rxbadpkt: entry(&pkts, "pkts", 4 * index + 3)?,
            })
        })
        .collect()
}

fn capture<'t>(re: &Regex, var: &'static str, text: &'t str) -> Result<&'t str, ParseError> {
    re.captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
        .ok_or(ParseError::PatternNotFound(var))
}

fn int_array(csv: &str, var: &'static str) -> Result<Vec<u64>, ParseError> {
    csv.split(',')
        .map(|token| {
            let token = token.trim();
            token
                .parse::<u64>()
                .map_err(|_| ParseError::MalformedLiteral(format!("{var}: non-integer entry '{token}'")))
        })
        .collect()
}

fn entry(values: &[u64], var: &'static str, index: usize) -> Result<u64, ParseError> {
    values
        .get(index)
        .copied()
        .ok_or_else(|| ParseError::IndexOutOfRange(format!("{var} has {} entries, index {index} is missing", values.len())))
}
