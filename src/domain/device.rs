use serde::{Deserialize, Serialize};

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub description: String,
    pub mac_address: String,
    pub ip_address: String,
    pub subnet_mask: String,
    pub gateway: String,
    pub firmware: String,
    pub hardware: String,
    pub ports: Vec<Port>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub port_num: u16,
    pub state: PortState,
    pub link_status: LinkMode,
    pub txgoodpkt: u64,
    pub txbadpkt: u64,
    pub rxgoodpkt: u64,
    pub rxbadpkt: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PortState {
    Disabled,
    Enabled,
}

impl PortState {
    /// Maps the numeric code used on the port statistics page. Anything other
    /// than 0 or 1 means the firmware speaks a dialect this model does not
    /// know, so there is no label for it.
    pub fn from_code(code: u64) -> Option<PortState> {
        match code {
            0 => Some(PortState::Disabled),
            1 => Some(PortState::Enabled),
            _ => None,
        }
    }
}

/// Negotiated link mode as reported by the switch. Code 7 is emitted by some
/// firmware revisions for reserved entries and carries an empty label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LinkMode {
    #[serde(rename = "Link Down")]
    LinkDown,
    Auto,
    #[serde(rename = "10Half")]
    TenHalf,
    #[serde(rename = "10Full")]
    TenFull,
    #[serde(rename = "100Half")]
    HundredHalf,
    #[serde(rename = "100Full")]
    HundredFull,
    #[serde(rename = "1000Full")]
    GigabitFull,
    #[serde(rename = "")]
    Reserved,
}

impl LinkMode {
    pub fn from_code(code: u64) -> Option<LinkMode> {
        match code {
            0 => Some(LinkMode::LinkDown),
            1 => Some(LinkMode::Auto),
            2 => Some(LinkMode::TenHalf),
            3 => Some(LinkMode::TenFull),
            4 => Some(LinkMode::HundredHalf),
            5 => Some(LinkMode::HundredFull),
            6 => Some(LinkMode::GigabitFull),
            7 => Some(LinkMode::Reserved),
            _ => None,
        }
    }
}
