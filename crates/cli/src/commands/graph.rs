use anyhow::Result;
use colored::*;
use chore_core::recipe_manager::RecipeManager;

pub fn execute(manager: &RecipeManager) -> Result<()> {
    println!("{}", "Recipe Dependency Graph:".bold().underline());

    let result = manager.get_dependency_graph();
    let graph = &result.graph;

    if graph.node_count() == 0 {
        println!("No recipes available");
        return Ok(());
    }

    for (node_index, node_weight) in graph.node_indices().zip(graph.node_weights()) {
        println!("{}", node_weight.blue().bold());

        // petgraph yields neighbors newest edge first; show them in declared order
        let mut deps: Vec<String> = graph
            .neighbors(node_index)
            .filter_map(|neighbor| graph.node_weight(neighbor).cloned())
            .collect();
        deps.reverse();

        if !deps.is_empty() {
            println!("  {} {}", "depends on:".dimmed(), deps.join(", "));
        } else {
            println!("  {}", "no dependencies".dimmed());
        }
        println!();
    }

    Ok(())
}
