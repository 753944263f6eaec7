//! The `nbgrade init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("nbgrade.toml").exists() {
        println!("nbgrade.toml already exists, skipping.");
    } else {
        std::fs::write("nbgrade.toml", SAMPLE_CONFIG)?;
        println!("Created nbgrade.toml");
    }

    println!("\nNext steps:");
    println!("  1. Set `interpreter` in nbgrade.toml to the program that runs your checks");
    println!("  2. Run: nbgrade inspect --notebook hw01.ipynb");
    println!("  3. Run: nbgrade grade --notebook hw01.ipynb --question q1");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# nbgrade configuration

# Metadata key holding the `tests` mapping: metadata.<namespace_key>.tests.<question>
namespace_key = "otter"

# Each case body is written to a file and run as: <interpreter> <interpreter_args...> <file>
interpreter = "python3"
interpreter_args = []
timeout_secs = 30

# How exception-format blobs are split into cases: "opaque" (one case) or "json"
decoder = "opaque"
"#;
