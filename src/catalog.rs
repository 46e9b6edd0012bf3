//! Amateur-radio satellite catalogs and the selection menu.
//!
//! Two static catalogs map satellite names to NORAD catalog numbers. Entries
//! listed with [`UNTRACKED_NORAD_ID`] are not yet tracked by the prediction
//! API; they can still be selected and simply fail the lookup.

use crate::prompt::Prompter;
use crate::Error;

/// Placeholder NORAD ID for satellites the API does not track yet.
pub const UNTRACKED_NORAD_ID: u32 = 999_999;

/// Longest manual NORAD input accepted (a string-length bound, not a value bound).
pub const MAX_NORAD_INPUT_LEN: usize = 99_999;

/// One satellite in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Name shown in the menu
    pub name: &'static str,
    /// NORAD catalog number ([`UNTRACKED_NORAD_ID`] if not tracked)
    pub norad_id: u32,
}

const fn entry(name: &'static str, norad_id: u32) -> CatalogEntry {
    CatalogEntry { name, norad_id }
}

/// FM repeater satellites.
pub const FM_SATELLITES: &[CatalogEntry] = &[
    entry("SO-50", 27607),
    entry("AO-85", 40967),
    entry("AO-91", 43017),
    entry("AO-92", 43147),
    entry("Funcube", UNTRACKED_NORAD_ID),
    entry("LilacSat-2", 40908),
    entry("IO-86", 40931),
    entry("PO-101", 43678),
];

/// Linear transponder satellites.
pub const TRANSPONDER_SATELLITES: &[CatalogEntry] = &[
    entry("AO-7", 7530),
    entry("FO-29", 24278),
    entry("AO-73", 39444),
    entry("XW-2A", 40903),
    entry("XW-2B", 40911),
    entry("XW-2C", 40906),
    entry("XW-2D", 40907),
    entry("XW-2F", 40910),
    entry("LO-87", UNTRACKED_NORAD_ID),
    entry("EO-88", 42017),
    entry("CAS-4A", UNTRACKED_NORAD_ID),
    entry("CAS-4B", UNTRACKED_NORAD_ID),
    entry("JO-97", 43803),
    entry("FO-99", UNTRACKED_NORAD_ID),
    entry("QO-100", 43700),
];

/// A satellite catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Fm,
    Transponder,
}

impl Catalog {
    /// Heading printed above the catalog listing.
    pub fn title(self) -> &'static str {
        match self {
            Catalog::Fm => "FM Satellites:",
            Catalog::Transponder => "Transponder Satellites:",
        }
    }

    /// Catalog entries in declaration order.
    pub fn entries(self) -> &'static [CatalogEntry] {
        match self {
            Catalog::Fm => FM_SATELLITES,
            Catalog::Transponder => TRANSPONDER_SATELLITES,
        }
    }

    /// Satellite names in lexicographic order.
    pub fn sorted_names(self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.entries().iter().map(|e| e.name).collect();
        names.sort_unstable();
        names
    }

    /// NORAD ID for an exact name in this catalog.
    pub fn lookup(self, name: &str) -> Option<u32> {
        self.entries()
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.norad_id)
    }
}

/// Look a name up in every catalog.
pub fn lookup_any(name: &str) -> Option<u32> {
    [Catalog::Fm, Catalog::Transponder]
        .into_iter()
        .find_map(|c| c.lookup(name))
}

/// Manual NORAD input check: 1 to 99999 characters, nothing else.
///
/// ```
/// use inky_amsat::catalog::is_valid_norad_input;
///
/// assert!(is_valid_norad_input("27607"));
/// assert!(!is_valid_norad_input(""));
/// ```
pub fn is_valid_norad_input(input: &str) -> bool {
    (1..=MAX_NORAD_INPUT_LEN).contains(&input.chars().count())
}

/// Top-level menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Browse(Catalog),
    ManualEntry,
}

impl MenuAction {
    /// Parse a menu answer (`1`, `2` or `3`).
    pub fn parse(input: &str) -> Result<Self, Error> {
        match input.trim().parse::<i64>() {
            Ok(1) => Ok(MenuAction::Browse(Catalog::Fm)),
            Ok(2) => Ok(MenuAction::Browse(Catalog::Transponder)),
            Ok(3) => Ok(MenuAction::ManualEntry),
            _ => Err(Error::InvalidAction(input.to_string())),
        }
    }
}

const MENU: &str = "1\tSelect an FM satellite\n\
                    2\tSelect a transponder satellite\n\
                    3\tManually enter a 5-digit NORAD ID";

const SELECTION_PROMPT: &str = "Enter your selection: \n";

const NORAD_PROMPT: &str = "Please enter a 5-digit NORAD ID: ";

/// Show the menu and resolve the answer to a NORAD identifier.
///
/// With `validate_names`, a satellite name not found in either catalog is
/// asked again; without it, an unknown name is an error.
pub fn select_satellite<P: Prompter>(prompter: &mut P, validate_names: bool) -> Result<String, Error> {
    prompter.say(MENU)?;
    let answer = prompter.ask(SELECTION_PROMPT)?;

    let norad = match MenuAction::parse(&answer)? {
        MenuAction::Browse(catalog) => {
            let mut listing = format!("\n{}\n", catalog.title());
            for name in catalog.sorted_names() {
                listing.push('\t');
                listing.push_str(name);
                listing.push('\n');
            }
            prompter.say(&listing)?;

            let name = if validate_names {
                prompter.ask_until(
                    "satellite name",
                    SELECTION_PROMPT,
                    "That's not a listed satellite. Please try again.",
                    |s| lookup_any(s).is_some(),
                )?
            } else {
                prompter.ask(SELECTION_PROMPT)?
            };

            // Validated names may come from the other catalog
            let id = catalog
                .lookup(&name)
                .or_else(|| validate_names.then(|| lookup_any(&name)).flatten())
                .ok_or_else(|| Error::UnknownSatellite(name.clone()))?;
            tracing::info!("Selected {} (NORAD {})", name, id);
            id.to_string()
        }
        MenuAction::ManualEntry => ask_norad(prompter)?,
    };

    Ok(norad)
}

/// Ask for a NORAD ID by hand.
pub fn ask_norad<P: Prompter>(prompter: &mut P) -> Result<String, Error> {
    prompter.ask_until(
        "NORAD ID",
        NORAD_PROMPT,
        "That's not a valid NORAD ID. Please try again.",
        is_valid_norad_input,
    )
}
