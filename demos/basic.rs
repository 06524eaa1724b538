//! Basic example demonstrating the HubSpot deal client.
//!
//! Run with:
//! ```
//! HUBSPOT_ACCESS_TOKEN=your-token cargo run --example basic
//! ```

use hubapi::{
    AssociationKind, Deal, FilterOperator, HubSpotClient, ListRequestOptions,
    RecentRequestOptions, SearchFilter, SearchRequestOptions,
};

#[tokio::main]
async fn main() -> hubapi::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    // Create client from environment variables
    println!("Creating HubSpot client...");
    let client = HubSpotClient::from_env()?;
    println!(
        "Connected to: {} ({})",
        client.base_url(),
        if client.uses_oauth() { "bearer token" } else { "API key" }
    );

    // List first page of deals
    println!("\n--- Listing Deals (first page) ---");
    let options = ListRequestOptions::new(10).with_properties(["dealname", "amount", "dealstage"]);
    let page = client.deals().list::<Deal>(true, &options).await?;
    println!("Found {} deals (more: {})", page.deals.len(), page.has_more);

    for deal in &page.deals {
        println!(
            "  - {} ({:?}) amount={:?} stage={}",
            deal.dealname.as_deref().unwrap_or("unnamed"),
            deal.id,
            deal.amount,
            deal.dealstage.as_deref().unwrap_or("unknown")
        );
    }

    // Create a deal and link it to the first associated company we saw
    println!("\n--- Creating Deal ---");
    let draft = Deal::default()
        .with_name("hubapi demo deal")
        .with_amount(1000.0)
        .with_stage("appointmentscheduled");
    let created = client.deals().create(&draft).await?;
    println!("Created deal {:?}", created.id);

    let company = page
        .deals
        .iter()
        .filter_map(|d| d.associations.associated_companies.as_ref())
        .flatten()
        .next()
        .copied();

    let created = match company {
        Some(company_id) => {
            println!("Associating with company {company_id}");
            client
                .deals()
                .associate_to(created, company_id, AssociationKind::Company)
                .await?
        }
        None => created,
    };

    let created = client.deals().get_associations(created).await?;
    println!("  Associations: {:?}", created.associations);

    // Search
    println!("\n--- Searching Won Deals ---");
    let search = SearchRequestOptions::default()
        .with_filter_group(vec![SearchFilter::new(
            "dealstage",
            FilterOperator::Eq,
            "closedwon",
        )])
        .with_properties(["dealname", "amount"]);
    let results = client.deals().search::<Deal>(&search).await?;
    println!("{} won deals", results.total);

    // Recent activity
    println!("\n--- Recently Modified ---");
    let recent = client
        .deals()
        .recently_updated::<Deal>(&RecentRequestOptions::new(5))
        .await?;
    for deal in &recent.results {
        println!("  - {:?} {:?}", deal.id, deal.dealname);
    }

    // Clean up
    if let Some(id) = created.id {
        client.deals().delete(id).await?;
        println!("\nDeleted deal {id}");
    }

    println!("\nDone!");
    Ok(())
}
