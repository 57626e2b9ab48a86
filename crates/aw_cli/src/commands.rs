use crate::cli::Commands;
use anyhow::{bail, Context, Result};
use aw_client::App;
use aw_core::{Article, ArticleChanges, NewArticle};

pub async fn handle_command(command: Commands, app: &mut App) -> Result<()> {
    match command {
        Commands::Login { username, password } => {
            app.login(&username, &password)
                .await
                .context("login failed")?;
            print_message(app);
        }
        Commands::Logout => {
            app.logout().await.context("logout failed")?;
            print_message(app);
        }
        Commands::List => {
            app.fetch_all().await.context("could not fetch articles")?;
            print_message(app);
            if app.state().articles().is_empty() {
                println!("No articles");
            }
            for article in app.state().articles() {
                print_article(article);
            }
        }
        Commands::Create { title, text, topic } => {
            app.create(NewArticle::new(title, text, topic))
                .await
                .context("could not create article")?;
            print_message(app);
            if let Some(article) = app.state().articles().as_slice().last() {
                print_article(article);
            }
        }
        Commands::Update {
            id,
            title,
            text,
            topic,
        } => {
            let changes = ArticleChanges { title, text, topic };
            if changes.is_empty() {
                bail!("nothing to update, pass at least one of --title, --text or --topic");
            }
            app.update(id, changes)
                .await
                .with_context(|| format!("could not update article {}", id))?;
            print_message(app);
        }
        Commands::Delete { id } => {
            app.delete(id)
                .await
                .with_context(|| format!("could not delete article {}", id))?;
            print_message(app);
        }
        Commands::Tui | Commands::Serve { .. } => bail!("not a one-shot command"),
    }
    Ok(())
}

fn print_message(app: &App) {
    let message = app.state().message();
    if !message.is_empty() {
        println!("{}", message);
    }
}

fn print_article(article: &Article) {
    println!("#{} [{}] {}", article.article_id, article.topic, article.title);
    println!("    {}", article.text);
}
