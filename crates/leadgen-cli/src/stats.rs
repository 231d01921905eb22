//! The `stats` command: store-wide lead and URL counts.

use sqlx::PgPool;

pub(crate) async fn show_stats(pool: &PgPool) -> anyhow::Result<()> {
    let leads = leadgen_db::lead_statistics(pool).await?;
    let urls = leadgen_db::url_statistics(pool).await?;

    println!("leads: {} total, {} with contact info", leads.total, leads.with_contact_info);
    for p in &leads.per_platform {
        println!("  {}: {}", p.platform, p.count);
    }
    println!("categories:");
    for c in &leads.per_category {
        println!("  {}: {}", c.platform, c.count);
    }

    println!(
        "collected URLs: {} total across {} queries",
        urls.total, urls.distinct_queries
    );
    for p in &urls.per_platform {
        println!("  {}: {}", p.platform, p.count);
    }

    Ok(())
}
