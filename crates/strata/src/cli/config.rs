//! `strata config` command implementation.

use super::{Options, print_json};

/// Run the config command.
///
/// Edge types passed with `--disable` are merged into the printed
/// `disabled-edge-types`.
pub fn run(options: &Options) -> Result<(), strata::Error> {
    let mut config = options.load_config()?;
    for edge_type in options.disabled_edge_types()? {
        if !config.disabled_edge_types.contains(&edge_type) {
            config.disabled_edge_types.push(edge_type);
        }
    }

    if options.json {
        return print_json(&config);
    }

    print!("{}", config.to_yaml()?);
    Ok(())
}
