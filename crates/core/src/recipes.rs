//! Recipe color management and a one-call entry point for running recipes

use colored::*;

use crate::execution::runner::{RecipeRunner, RecipeRunnerConfig};
use crate::execution_plan::ExecutionPlan;
use crate::recipe_book::RecipeBook;
use crate::types::ChoreResult;
use crate::variables::VariableResolver;

/// Label colors for recipe headers. Status output owns red, yellow and green.
const RECIPE_PALETTE: [(u8, u8, u8); 8] = [
    (97, 175, 239),  // sky
    (198, 120, 221), // orchid
    (86, 182, 194),  // teal
    (229, 152, 102), // apricot
    (171, 178, 191), // slate
    (240, 113, 176), // rose
    (130, 140, 255), // periwinkle
    (209, 154, 102), // tan
];

/// Pick a stable label color for a recipe name (FNV-1a over its bytes)
pub fn get_recipe_color(recipe_name: &str) -> Color {
    let hash = recipe_name.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, b| {
        (acc ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
    });
    let (r, g, b) = RECIPE_PALETTE[(hash % RECIPE_PALETTE.len() as u64) as usize];
    Color::TrueColor { r, g, b }
}

/// Run a plan with a fresh variable resolver
pub async fn run_recipes(
    book: &RecipeBook,
    root: &std::path::Path,
    plan: &ExecutionPlan,
    config: RecipeRunnerConfig,
) -> ChoreResult<()> {
    let mut resolver = VariableResolver::new(root, book.file_env(), book.variables());
    RecipeRunner::new(book, root, config)
        .run_plan(plan, &mut resolver)
        .await
}
