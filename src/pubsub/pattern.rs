use globset::{GlobBuilder, GlobMatcher};

use crate::error::PatternError;

/// Glob-шаблон подписки.
///
/// Исходная строка хранится без изменений и служит ключом таблицы.
/// Компиляция выполняется один раз при первом сохранении шаблона;
/// некорректный шаблон сохраняется, но ни с чем не совпадает.
#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    raw: String,
    matcher: Option<GlobMatcher>,
}

impl Pattern {
    pub(crate) fn new(raw: &str) -> Self {
        let matcher = compile(raw).ok();
        if matcher.is_none() {
            tracing::debug!(pattern = raw, "stored glob pattern that does not compile");
        }
        Self {
            raw: raw.to_string(),
            matcher,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.raw
    }

    pub(crate) fn is_match(&self, name: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(name))
    }
}

/// Компилирует шаблон с семантикой `fnmatch(FNM_PATHNAME)`:
/// `*` и `?` не совпадают с `/`, `\` экранирует следующий символ.
fn compile(pattern: &str) -> Result<GlobMatcher, globset::Error> {
    let glob = GlobBuilder::new(&to_fnmatch(pattern))
        .literal_separator(true)
        .backslash_escape(true)
        .build()?;
    Ok(glob.compile_matcher())
}

/// Приводит шаблон к диалекту `fnmatch` перед разбором в `globset`.
///
/// Вне классов `[...]` фигурные скобки экранируются (в `fnmatch` нет
/// альтернатив `{a,b}`), а серия `*` сворачивается в одну звёздочку
/// (`**` не должен пересекать `/`).
fn to_fnmatch(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;
    let mut last_star = false;

    while let Some(c) = chars.next() {
        if in_class {
            out.push(c);
            match c {
                '\\' => {
                    if let Some(next) = chars.next() {
                        out.push(next);
                    }
                }
                ']' => in_class = false,
                _ => {}
            }
            continue;
        }

        if c == '*' && last_star {
            continue;
        }
        last_star = c == '*';

        match c {
            '\\' => {
                out.push(c);
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '[' => {
                out.push(c);
                in_class = true;
                // `!`/`^` и `]` сразу после `[` относятся к содержимому класса
                if let Some(&neg @ ('!' | '^')) = chars.peek() {
                    out.push(neg);
                    chars.next();
                }
                if chars.peek() == Some(&']') {
                    out.push(']');
                    chars.next();
                }
            }
            _ => out.push(c),
        }
    }
    out
}

/// Проверяет шаблон тем же компилятором, что использует реестр.
///
/// Реестр принимает любой шаблон и молча игнорирует некорректные при
/// публикации, поэтому диагностику нужно получать заранее:
///
/// ```
/// use pubsub_registry::validate_pattern;
///
/// assert!(validate_pattern("news.*").is_ok());
/// assert!(validate_pattern("news.[").is_err());
/// ```
pub fn validate_pattern(pattern: &str) -> Result<(), PatternError> {
    // в ошибке исходный шаблон, а не переписанный для `globset`
    compile(pattern).map_err(|err| PatternError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: err.kind().to_string(),
    })?;
    Ok(())
}

/// Совпадает ли имя канала с шаблоном. Некорректный шаблон не совпадает
/// ни с чем.
///
/// - `h?llo` совпадает с `hello`, `hallo` и `hxllo`
/// - `h*llo` совпадает с `hllo` и `heeeello`
/// - `h[ae]llo` совпадает с `hello` и `hallo`, но не с `hillo`
pub fn pattern_matches(pattern: &str, name: &str) -> bool {
    compile(pattern).is_ok_and(|m| m.is_match(name))
}
