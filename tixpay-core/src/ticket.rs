use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket tiers sold through the checkout flow
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TicketType {
    #[serde(rename = "regular+")]
    RegularPlus,
    #[serde(rename = "vip")]
    Vip,
    #[serde(rename = "vvip")]
    Vvip,
}

impl TicketType {
    /// Unit price in whole AED
    pub fn unit_price(&self) -> i64 {
        match self {
            TicketType::RegularPlus => 500,
            TicketType::Vip => 1000,
            TicketType::Vvip => 10_000,
        }
    }

    /// Line-item description shown on the gateway's hosted page
    pub fn description(&self) -> String {
        match self {
            TicketType::Vvip => "VVIP Table (8 People)".to_string(),
            other => format!("{} Ticket", other),
        }
    }
}

impl fmt::Display for TicketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketType::RegularPlus => "regular+",
            TicketType::Vip => "vip",
            TicketType::Vvip => "vvip",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TicketType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular+" => Ok(TicketType::RegularPlus),
            "vip" => Ok(TicketType::Vip),
            "vvip" => Ok(TicketType::Vvip),
            _ => Err(()),
        }
    }
}
