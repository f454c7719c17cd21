//! 画面表示用の派生ビュー
//!
//! すべて状態からの純粋関数で、描画のたびに計算し直す（キャッシュしない）。
//! 元のコレクションは並べ替えない。

use domain::Todo;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// 作成日時の降順
    #[default]
    NewestFirst,
    OldestFirst,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::NewestFirst => SortOrder::OldestFirst,
            SortOrder::OldestFirst => SortOrder::NewestFirst,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    /// タグごとのバケットに分けて表示
    Grouped,
}

/// 表示条件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub sort: SortOrder,
    pub mode: ViewMode,
    pub hide_completed: bool,
    /// 選択中のタグ（いずれかを持つ Todo のみ表示、空なら絞り込まない）
    pub tag_filter: BTreeSet<String>,
}

pub fn sort_by_created(todos: &[Todo], order: SortOrder) -> Vec<&Todo> {
    let mut sorted: Vec<&Todo> = todos.iter().collect();
    match order {
        SortOrder::OldestFirst => sorted.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOrder::NewestFirst => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
    sorted
}

/// 選択タグのいずれかを持つか（OR 条件）
pub fn matches_tag_filter(todo: &Todo, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || todo.tags.iter().any(|tag| selected.contains(tag))
}

pub fn filter_todos<'a>(
    todos: Vec<&'a Todo>,
    hide_completed: bool,
    selected: &BTreeSet<String>,
) -> Vec<&'a Todo> {
    todos
        .into_iter()
        .filter(|todo| !(hide_completed && todo.completed))
        .filter(|todo| matches_tag_filter(todo, selected))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup<'a> {
    /// `None` はタグなしのバケット
    pub tag: Option<&'a str>,
    pub todos: Vec<&'a Todo>,
}

/// タグごとに分割する。複数タグの Todo は各バケットに現れる。
/// バケットはタグ名順、タグなしは最後。空のバケットは作らない。
pub fn group_by_tag<'a>(todos: &[&'a Todo]) -> Vec<TagGroup<'a>> {
    let mut buckets: BTreeMap<&'a str, Vec<&'a Todo>> = BTreeMap::new();
    let mut untagged = Vec::new();

    for &todo in todos {
        if todo.tags.is_empty() {
            untagged.push(todo);
            continue;
        }
        for tag in todo.tags.iter() {
            buckets.entry(tag).or_default().push(todo);
        }
    }

    let mut groups: Vec<TagGroup<'a>> = buckets
        .into_iter()
        .map(|(tag, todos)| TagGroup {
            tag: Some(tag),
            todos,
        })
        .collect();
    if !untagged.is_empty() {
        groups.push(TagGroup {
            tag: None,
            todos: untagged,
        });
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoView<'a> {
    List(Vec<&'a Todo>),
    Grouped(Vec<TagGroup<'a>>),
}

impl<'a> TodoView<'a> {
    pub fn build(todos: &'a [Todo], options: &ViewOptions) -> Self {
        let visible = filter_todos(
            sort_by_created(todos, options.sort),
            options.hide_completed,
            &options.tag_filter,
        );
        match options.mode {
            ViewMode::List => TodoView::List(visible),
            ViewMode::Grouped => TodoView::Grouped(group_by_tag(&visible)),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            TodoView::List(todos) => todos.is_empty(),
            TodoView::Grouped(groups) => groups.is_empty(),
        }
    }
}

fn write_todo(f: &mut fmt::Formatter<'_>, todo: &Todo) -> fmt::Result {
    let mark = if todo.completed { 'x' } else { ' ' };
    write!(f, "[{mark}] {}", todo.title)?;
    for tag in todo.tags.iter() {
        write!(f, " #{tag}")?;
    }
    writeln!(f, "  ({})", todo.id)
}

impl fmt::Display for TodoView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No tasks yet.");
        }
        match self {
            TodoView::List(todos) => {
                for todo in todos {
                    write_todo(f, todo)?;
                }
            }
            TodoView::Grouped(groups) => {
                for (i, group) in groups.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    let heading = group.tag.map_or("Untagged".to_string(), |t| format!("#{t}"));
                    writeln!(f, "{heading} ({})", group.todos.len())?;
                    for todo in &group.todos {
                        write!(f, "  ")?;
                        write_todo(f, todo)?;
                    }
                }
            }
        }
        Ok(())
    }
}
