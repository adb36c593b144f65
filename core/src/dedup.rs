use crate::document::DocId;
use crate::error::Result;
use crate::server::SearchServer;
use std::collections::HashSet;
use tracing::info;

/// Remove every document whose set of indexed words equals that of a lower id.
/// Returns the removed ids, ascending.
pub fn remove_duplicates(server: &mut SearchServer) -> Result<Vec<DocId>> {
    let duplicates: Vec<DocId> = {
        let mut seen: HashSet<Vec<&str>> = HashSet::new();
        server
            .document_ids()
            .filter(|&id| {
                // keys are sorted, so equal word sets give equal vectors
                let words: Vec<&str> = server.word_frequencies(id).keys().map(String::as_str).collect();
                !seen.insert(words)
            })
            .collect()
    };

    for &id in &duplicates {
        info!(id, "found duplicate document");
        server.remove_document(id)?;
    }
    Ok(duplicates)
}
