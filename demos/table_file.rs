//! Loads an option table from YAML and shows help at two user levels.
//!
//! ```sh
//! cargo run -p simopt-demos --example table_file
//! ```

use simopt_config::TableFile;

const TABLE: &str = r#"
program: insane
declarations:
  - "Membrane options:"
  - flag: -l
    attribute: lipids
    type: string
    behavior: { multi: true }
    description: Lipid type and relative abundance
  - flag: -a
    attribute: area
    type: float
    default: 0.6
    description: Area per lipid (nm^2)
  - "Expert options:"
  - flag: -asym
    attribute: asymmetry
    type: integer
    level: 3
    default: 0
    description: Membrane asymmetry
"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = TableFile::from_yaml_str(TABLE)?.into_options()?;

    println!("--- level 0 ---");
    print!("{}", options.help(Some(&["-l", "POPC"][..]), 0)?);
    println!("--- all levels ---");
    print!("{}", options.usage());
    Ok(())
}
