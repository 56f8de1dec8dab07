//! Data file commands: `check-datafile` and `example-datafile`.

use serde::Serialize;

use netbox2ise_config::EXAMPLE_DATAFILE;
use netbox2ise_core::{ApiVersion, InventorySource, NetBoxInventory, backend_for};

use crate::cli::{CheckDatafileArgs, ExampleDatafileArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{datafile_path, load_validated};

#[derive(Debug, Serialize)]
pub struct DatafileCheck {
    pub path: String,
    pub version: ApiVersion,
    pub jobs: Vec<String>,
    pub netbox: String,
    pub ise: String,
}

fn render_table(check: &DatafileCheck) -> String {
    [
        format!("Data file: {} is valid", check.path),
        format!("ISE API:   {}", check.version),
        format!("Jobs:      {}", check.jobs.join(", ")),
        format!("NetBox:    {}", check.netbox),
        format!("ISE:       {}", check.ise),
    ]
    .join("\n")
}

pub fn check(args: &CheckDatafileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = args.file.clone().unwrap_or_else(|| datafile_path(global));
    let datafile = load_validated(&path)?;

    let inventory = NetBoxInventory::open(&datafile.netbox_export)?;
    let backend = backend_for(datafile.version, &datafile.ise_snapshot)?;

    let check = DatafileCheck {
        path: path.display().to_string(),
        version: datafile.version,
        jobs: datafile.jobs.iter().map(|j| j.name.clone()).collect(),
        netbox: inventory.verify()?,
        ise: backend.verify()?,
    };
    let rendered = output::render_report(global.output, &check, render_table)?;
    output::print_output(&rendered, global.quiet);
    Ok(())
}

pub fn example(args: &ExampleDatafileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let Some(ref path) = args.output_file else {
        output::print_output(EXAMPLE_DATAFILE.trim_end(), global.quiet);
        return Ok(());
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, EXAMPLE_DATAFILE)?;
    if !global.quiet {
        eprintln!("Example data file written to {}", path.display());
    }
    Ok(())
}
