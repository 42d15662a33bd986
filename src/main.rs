use project_admin::form::Field;
use project_admin::lifecycle::AdminSystem;
use project_admin::runtime::{setup_tracing, AdminConfig};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting project admin demo");
    let system = AdminSystem::new(AdminConfig::default());

    // Seed enough projects for two pages
    let span = tracing::info_span!("seeding");
    async {
        for n in 1..=7 {
            let mut dialog = system.create_form();
            dialog.open();
            dialog.set_field(Field::Name, format!("Project {n}"));
            dialog.submit().await.map_err(|e| e.to_string())?;
        }
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Browse: page 1 is full, so page 2 is prefetched behind it
    let mut list = system.list_controller();
    let span = tracing::info_span!("browsing");
    async {
        let view = list.load().await.map_err(|e| e.to_string())?;
        info!(page = view.page, rows = view.rows.len(), "Loaded");
        list.advance().map_err(|e| e.to_string())?;
        let rows = list.load().await.map_err(|e| e.to_string())?.rows.len();
        info!(page = list.page(), rows, next = list.has_next_page(), "Loaded");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    // Edit the first row on page 2, then see it through the placeholder
    let Some(project) = list.view().rows.first().cloned() else {
        return Err("page 2 is empty".to_string());
    };
    let span = tracing::info_span!("editing", id = %project.id);
    async {
        let mut dialog = system.edit_form(project);
        dialog.open();
        info!(can_submit = dialog.can_submit(), "Opened");
        dialog.set_field(Field::Description, "edited from the demo");

        match dialog.submit().await {
            Ok(saved) => info!(name = %saved.name, "Saved"),
            Err(e) => error!(error = %e, "Save failed"),
        }

        let view = list.load().await.map_err(|e| e.to_string())?;
        info!(placeholder = view.is_placeholder, "Stale page served");
        let view = list.refresh().await.map_err(|e| e.to_string())?;
        info!(placeholder = view.is_placeholder, "Page refreshed");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    drop(list);
    system.shutdown().await.map_err(|e| e.to_string())?;

    info!("Demo completed successfully");
    Ok(())
}
