use hoist_skills::search::SearchClient;

pub async fn handle_search(query: &str, page: u32) -> anyhow::Result<()> {
    let client = SearchClient::from_env();
    let results = client.search(query, page).await?;

    if results.results.is_empty() {
        println!("No skills matched '{query}'.");
        return Ok(());
    }

    for skill in &results.results {
        let installs = skill
            .installs
            .map(|n| format!(" · {n} installs"))
            .unwrap_or_default();
        println!("  {:<30} {}{installs}", skill.repo, skill.description);
    }
    println!(
        "\nPage {} of {}. Install with: hoist add <owner/repo>",
        results.page,
        results.total_pages.max(1)
    );
    Ok(())
}
