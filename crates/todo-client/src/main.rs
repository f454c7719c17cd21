//! todo-client バイナリのエントリポイント

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use domain::TodoId;
use todo_client::{HttpTodoApi, SortOrder, TodoApi, TodoApp, ViewMode};

#[derive(Parser, Debug)]
#[command(name = "todo-client", version, about = "Tagged todo list client")]
struct Cli {
    /// API のベース URL
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    /// タグごとにまとめて表示する
    #[arg(long)]
    grouped: bool,

    #[arg(long)]
    hide_completed: bool,

    /// 指定タグのいずれかを持つものだけ表示する（複数指定可）
    #[arg(long = "tag", value_name = "TAG")]
    tags: Vec<String>,

    #[arg(long)]
    oldest_first: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 一覧を表示する（既定）
    List,
    /// タスクを追加する
    Add { title: Vec<String> },
    /// 完了にする
    Done { id: String },
    /// 未完了に戻す
    Undo { id: String },
    /// タイトルを変更する
    Rename { id: String, title: Vec<String> },
    /// タグを付ける
    Tag { id: String, tag: String },
    /// タグを外す
    Untag { id: String, tag: String },
    /// 削除する
    Rm { id: String },
}

/// 一覧に表示された ID の先頭部分からタスクを特定する
fn resolve_id<A: TodoApi>(app: &TodoApp<A>, prefix: &str) -> anyhow::Result<TodoId> {
    let matches: Vec<&TodoId> = app
        .todos()
        .iter()
        .map(|t| &t.id)
        .filter(|id| id.as_str().starts_with(prefix))
        .collect();
    match matches.as_slice() {
        [id] => Ok((*id).clone()),
        [] => bail!("no task matches id '{prefix}'"),
        _ => bail!("id '{prefix}' is ambiguous ({} matches)", matches.len()),
    }
}

async fn set_completed<A: TodoApi>(
    app: &mut TodoApp<A>,
    prefix: &str,
    completed: bool,
) -> anyhow::Result<()> {
    let id = resolve_id(app, prefix)?;
    let current = app.find(&id).map(|t| t.completed);
    if current != Some(completed) {
        app.toggle_completed(&id).await?;
    }
    Ok(())
}

async fn run<A: TodoApi>(app: &mut TodoApp<A>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::List => {}
        Command::Add { title } => {
            app.set_new_task(title.join(" "));
            if app.add_todo().await?.is_none() {
                bail!("title must not be empty");
            }
        }
        Command::Done { id } => set_completed(app, &id, true).await?,
        Command::Undo { id } => set_completed(app, &id, false).await?,
        Command::Rename { id, title } => {
            let id = resolve_id(app, &id)?;
            app.start_edit(&id);
            app.set_edit_title(title.join(" "));
            if app.save_edit().await?.is_none() {
                bail!("title must not be empty");
            }
        }
        Command::Tag { id, tag } => {
            let id = resolve_id(app, &id)?;
            app.add_tag(&id, &tag).await?;
        }
        Command::Untag { id, tag } => {
            let id = resolve_id(app, &id)?;
            app.remove_tag(&id, &tag).await?;
        }
        Command::Rm { id } => {
            let id = resolve_id(app, &id)?;
            app.delete_todo(&id).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared::init_cli_tracing()?;
    let cli = Cli::parse();

    let mut app = TodoApp::new(HttpTodoApi::new(&cli.api_url));
    app.mount()
        .await
        .with_context(|| format!("failed to load tasks from {}", cli.api_url))?;

    if cli.grouped {
        app.set_view_mode(ViewMode::Grouped);
    }
    if cli.hide_completed {
        app.toggle_hide_completed();
    }
    if cli.oldest_first {
        app.set_sort(SortOrder::OldestFirst);
    }
    for tag in &cli.tags {
        app.toggle_tag_filter(tag);
    }

    run(&mut app, cli.command.unwrap_or(Command::List)).await?;

    print!("{}", app.view());
    Ok(())
}
