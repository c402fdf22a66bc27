//! Request normalization: every input mode funnels into one [`MapDataset`].
//!
//! - [`spreadsheet`]: tabular files (`.csv`, `.xlsx`, `.xls`)
//! - [`completion`]: free text interpreted by the completion service
//! - [`fallback`]: free text interpreted locally, no credential required

pub mod completion;
pub mod fallback;
pub mod spreadsheet;

use crate::model::MapDataset;
use crate::proxy::CompletionClient;
use crate::{Error, Result};

/// Normalizes a free-text description through the completion service.
pub fn describe(client: &dyn CompletionClient, description: &str) -> Result<MapDataset> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::input("empty map description"));
    }
    let reply = client.complete(completion::SYSTEM_PROMPT, description)?;
    completion::dataset_from_reply(&reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedClient(&'static str);

    impl CompletionClient for CannedClient {
        fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn describe_rejects_empty_description_before_calling_out() {
        let client = CannedClient("{}");
        assert!(matches!(
            describe(&client, "  ").unwrap_err(),
            Error::Input { .. }
        ));
    }

    #[test]
    fn describe_validates_the_reply() {
        let client = CannedClient("not json at all");
        assert!(matches!(
            describe(&client, "map of France").unwrap_err(),
            Error::ModelResponse { .. }
        ));
    }

    #[test]
    fn describe_accepts_a_valid_reply() {
        let client = CannedClient(
            r##"{
                "mapType": "world",
                "states": [ { "state": "France", "postalCode": "FRA", "label": "France" } ],
                "defaultFill": "#f3f3f3",
                "highlightColors": { "FRA": "#3b82f6" },
                "showLabels": false
            }"##,
        );
        let ds = describe(&client, "map of France").unwrap();
        assert_eq!(ds.regions.len(), 1);
        assert_eq!(ds.regions[0].code, "FRA");
    }
}
