use color_eyre::eyre::Result;
use project_board::{
    utils::{
        constants::{prod, API_BASE_URL, API_TOKEN, PAGE_SIZE},
        tracing::init_tracing,
    },
    Application,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let app = Application::build(
        &API_BASE_URL,
        API_TOKEN.clone(),
        prod::http_client::TIMEOUT,
        *PAGE_SIZE,
    )?;

    let view = app.run().await?;
    for row in view.rows {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            row.post.created_at,
            row.post.author,
            row.post.task_name.as_deref().unwrap_or("-"),
            row.post.status.label(),
            row.post.due_date,
        );
    }
    println!(
        "page {}/{}",
        view.pagination.page,
        view.pagination.page_count().max(1)
    );

    Ok(())
}
