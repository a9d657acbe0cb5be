use anyhow::Result;
use chore_core::configs::recipes::recipe_file_schema;

pub fn execute() -> Result<()> {
    println!("{}", recipe_file_schema()?);
    Ok(())
}
