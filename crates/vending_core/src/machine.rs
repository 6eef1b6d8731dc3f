use std::fmt;
use std::str::FromStr;

/// The closed set of machines a purchase can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MachineKind {
    TokenDispenser,
    Gumball,
    Candy,
    MemberCard,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown machine {0:?}")]
pub struct UnknownMachine(pub String);

impl MachineKind {
    pub const ALL: [MachineKind; 4] = [
        MachineKind::TokenDispenser,
        MachineKind::Gumball,
        MachineKind::Candy,
        MachineKind::MemberCard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            MachineKind::TokenDispenser => "tokenDispenser",
            MachineKind::Gumball => "gumball",
            MachineKind::Candy => "candy",
            MachineKind::MemberCard => "member",
        }
    }

    /// Name of the token the machine hands out, if it has a quoted output.
    pub fn output_token_name(self) -> Option<&'static str> {
        match self {
            MachineKind::TokenDispenser => None,
            MachineKind::Gumball => Some("Gumballs"),
            MachineKind::Candy => Some("Candies"),
            MachineKind::MemberCard => Some("Member Cards"),
        }
    }

    /// Whether a purchase spends the input token (everything but the dispenser).
    pub fn consumes_input(self) -> bool {
        !matches!(self, MachineKind::TokenDispenser)
    }
}

impl fmt::Display for MachineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MachineKind {
    type Err = UnknownMachine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        MachineKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(needle))
            .ok_or_else(|| UnknownMachine(needle.to_string()))
    }
}
