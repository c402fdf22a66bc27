use crate::boundaries::{feature_code, feature_name};
use crate::model::{MapDomain, RegionRecord};
use geojson::Feature;

/// US postal code to state name, including DC. Used both by the resolver's
/// alias strategy and by the local fallback parser to reject junk tokens.
pub const US_STATES: &[(&str, &str)] = &[
    ("AL", "Alabama"),
    ("AK", "Alaska"),
    ("AZ", "Arizona"),
    ("AR", "Arkansas"),
    ("CA", "California"),
    ("CO", "Colorado"),
    ("CT", "Connecticut"),
    ("DE", "Delaware"),
    ("DC", "District of Columbia"),
    ("FL", "Florida"),
    ("GA", "Georgia"),
    ("HI", "Hawaii"),
    ("ID", "Idaho"),
    ("IL", "Illinois"),
    ("IN", "Indiana"),
    ("IA", "Iowa"),
    ("KS", "Kansas"),
    ("KY", "Kentucky"),
    ("LA", "Louisiana"),
    ("ME", "Maine"),
    ("MD", "Maryland"),
    ("MA", "Massachusetts"),
    ("MI", "Michigan"),
    ("MN", "Minnesota"),
    ("MS", "Mississippi"),
    ("MO", "Missouri"),
    ("MT", "Montana"),
    ("NE", "Nebraska"),
    ("NV", "Nevada"),
    ("NH", "New Hampshire"),
    ("NJ", "New Jersey"),
    ("NM", "New Mexico"),
    ("NY", "New York"),
    ("NC", "North Carolina"),
    ("ND", "North Dakota"),
    ("OH", "Ohio"),
    ("OK", "Oklahoma"),
    ("OR", "Oregon"),
    ("PA", "Pennsylvania"),
    ("RI", "Rhode Island"),
    ("SC", "South Carolina"),
    ("SD", "South Dakota"),
    ("TN", "Tennessee"),
    ("TX", "Texas"),
    ("UT", "Utah"),
    ("VT", "Vermont"),
    ("VA", "Virginia"),
    ("WA", "Washington"),
    ("WV", "West Virginia"),
    ("WI", "Wisconsin"),
    ("WY", "Wyoming"),
];

/// Common country spellings that differ from the boundary dataset's display
/// names (Natural Earth conventions).
const WORLD_ALIASES: &[(&str, &str)] = &[
    ("usa", "United States of America"),
    ("united states", "United States of America"),
    ("america", "United States of America"),
    ("uk", "United Kingdom"),
    ("great britain", "United Kingdom"),
    ("britain", "United Kingdom"),
    ("south korea", "South Korea"),
    ("czech republic", "Czechia"),
    ("ivory coast", "Côte d'Ivoire"),
    ("burma", "Myanmar"),
    ("holland", "Netherlands"),
    ("drc", "Democratic Republic of the Congo"),
];

pub fn us_state_name(code: &str) -> Option<&'static str> {
    US_STATES
        .iter()
        .find(|(postal, _)| *postal == code)
        .map(|(_, name)| *name)
}

pub fn is_us_state_code(code: &str) -> bool {
    us_state_name(code).is_some()
}

/// Matches normalized region records against boundary features.
///
/// Strategies are applied per region in a fixed priority order; the first
/// feature (in dataset order) satisfying the first succeeding strategy wins,
/// so resolution is deterministic for a given dataset.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    domain: MapDomain,
}

impl Resolver {
    pub fn new(domain: MapDomain) -> Self {
        Self { domain }
    }

    pub fn resolve<'a>(
        &self,
        record: &RegionRecord,
        features: &'a [Feature],
    ) -> Option<&'a Feature> {
        self.resolve_index(record, features).map(|i| &features[i])
    }

    /// Index form of [`Resolver::resolve`] for callers that key per-feature
    /// state (the scene layout does).
    pub fn resolve_index(&self, record: &RegionRecord, features: &[Feature]) -> Option<usize> {
        if let Some(index) = self.by_exact_code(record, features) {
            return Some(index);
        }
        if let Some(index) = self.by_name(record, features) {
            return Some(index);
        }
        if let Some(index) = self.by_alias(record, features) {
            return Some(index);
        }
        let found = self.by_substring(record, features);
        if found.is_none() {
            tracing::debug!(
                code = %record.code,
                name = %record.name,
                domain = %self.domain,
                "region did not resolve to a boundary feature"
            );
        }
        found
    }

    fn by_exact_code(&self, record: &RegionRecord, features: &[Feature]) -> Option<usize> {
        features
            .iter()
            .position(|f| feature_code(f, self.domain) == Some(record.code.as_str()))
    }

    fn by_name(&self, record: &RegionRecord, features: &[Feature]) -> Option<usize> {
        let wanted = normalized(&record.name);
        if wanted.is_empty() {
            return None;
        }
        features
            .iter()
            .position(|f| feature_name(f).map(normalized).as_deref() == Some(wanted.as_str()))
    }

    fn by_alias(&self, record: &RegionRecord, features: &[Feature]) -> Option<usize> {
        let canonical = match self.domain {
            MapDomain::Us => us_state_name(&record.code)
                .or_else(|| us_state_name(record.name.trim().to_ascii_uppercase().as_str())),
            MapDomain::World => {
                let name = normalized(&record.name);
                let code = normalized(&record.code);
                WORLD_ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == name || *alias == code)
                    .map(|(_, canonical)| *canonical)
            }
        }?;
        let canonical = normalized(canonical);
        features
            .iter()
            .position(|f| feature_name(f).map(normalized).as_deref() == Some(canonical.as_str()))
    }

    fn by_substring(&self, record: &RegionRecord, features: &[Feature]) -> Option<usize> {
        let wanted = normalized(&record.name);
        // A 2-character needle matches half the atlas; require a real name.
        if wanted.len() < 3 {
            return None;
        }
        features.iter().position(|f| {
            feature_name(f).map(normalized).is_some_and(|name| {
                (name.len() >= 3) && (name.contains(&wanted) || wanted.contains(&name))
            })
        })
    }
}

fn normalized(text: &str) -> String {
    text.trim().to_lowercase()
}
