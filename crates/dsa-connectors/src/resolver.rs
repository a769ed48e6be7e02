use eyre::{eyre, Result};

use crate::scanner::ConnectorDescriptor;

/// Finds the connector with exactly the requested name.
///
/// When the name is unknown, the error lists every scanned connector so that
/// the operator can pick the right one.
pub fn resolve<'a>(
    name: &str,
    connectors: &'a [ConnectorDescriptor],
) -> Result<&'a ConnectorDescriptor> {
    let mut matches = connectors.iter().filter(|connector| connector.name == name);
    let connector = matches.next().ok_or_else(|| {
        eyre!(
            "can not find the connector!\nsupported connector names are:\n{}",
            connectors
                .iter()
                .map(|connector| connector.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        )
    })?;

    // The same contract name in two trees would make the compiled artifact
    // ambiguous.
    let duplicates = matches.collect::<Vec<_>>();
    if !duplicates.is_empty() {
        return Err(eyre!(
            "connector {} is declared more than once:\n{}",
            name,
            std::iter::once(connector)
                .chain(duplicates)
                .map(|connector| connector.source_path.display().to_string())
                .collect::<Vec<_>>()
                .join("\n")
        ));
    }

    Ok(connector)
}
