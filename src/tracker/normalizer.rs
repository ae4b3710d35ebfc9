use tracing::debug;

use crate::models::{AdvisoryRecord, AdvisoryState, WatchList};

/// Most recent type/level header seen. Rows with merged type/level cells
/// (4 columns) inherit it from the last 6-column row.
#[derive(Debug, Clone, Default)]
struct Header {
    kind: String,
    level: String,
}

/// Convert scraped table rows into the watch-list filtered [`AdvisoryState`].
///
/// Row shapes:
/// - 6 cells: `type, level, area, announce, effective, clear` (sets the header)
/// - 4 cells: `area, announce, effective, clear` (uses the current header)
///
/// Any other shape is skipped. Later rows overwrite earlier ones with the same key.
pub fn normalize<R: AsRef<[String]>>(rows: &[R], watch: &WatchList) -> AdvisoryState {
    let (_, state) = rows.iter().enumerate().fold(
        (Header::default(), AdvisoryState::new()),
        |(header, mut state), (index, row)| {
            let cells: Vec<&str> = row.as_ref().iter().map(|c| c.trim()).collect();

            let (header, data) = match cells.as_slice() {
                [kind, level, rest @ ..] if rest.len() == 4 => (
                    Header {
                        kind: kind.to_string(),
                        level: level.to_string(),
                    },
                    rest,
                ),
                data if data.len() == 4 => (header, data),
                other => {
                    debug!(row = index, cells = other.len(), "skipping non-data row");
                    return (header, state);
                }
            };

            let [area, announce, effective, clear] = data else {
                return (header, state);
            };

            if let Some(matched) = watch.matches(area) {
                debug!(row = index, area = %matched, kind = %header.kind, "watched advisory");
                state.insert(AdvisoryRecord {
                    area: matched,
                    kind: header.kind.clone(),
                    level: header.level.clone(),
                    announce_time: announce.to_string(),
                    effective_time: effective.to_string(),
                    clear_notice: clear.to_string(),
                });
            }

            (header, state)
        },
    );

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdvisoryKey;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn watch(entries: &[&str]) -> WatchList {
        WatchList::new(entries.iter().map(|s| s.to_string()).collect())
    }

    fn key(area: &str, kind: &str) -> AdvisoryKey {
        AdvisoryKey {
            area: area.to_string(),
            kind: kind.to_string(),
        }
    }

    #[test]
    fn test_six_and_four_column_rows() {
        let rows = vec![
            row(&["풍랑", "주의보", "충남 보령시", "10:00", "11:00", ""]),
            row(&["태안군", "10:05", "11:05", "내일 오전"]),
        ];
        let state = normalize(&rows, &watch(&["보령시", "태안군"]));

        assert_eq!(state.len(), 2);
        let taean = state.get(&key("태안군", "풍랑")).unwrap();
        assert_eq!(taean.level, "주의보");
        assert_eq!(taean.announce_time, "10:05");
        assert_eq!(taean.clear_notice, "내일 오전");
    }

    #[test]
    fn test_header_switches_on_new_six_column_row() {
        let rows = vec![
            row(&["풍랑", "주의보", "부산", "1", "2", ""]),
            row(&["강풍", "경보", "서울", "1", "2", ""]),
            row(&["보령시", "3", "4", ""]),
        ];
        let state = normalize(&rows, &watch(&["보령시"]));

        let record = state.get(&key("보령시", "강풍")).unwrap();
        assert_eq!(record.level, "경보");
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let rows = vec![
            row(&[]),
            row(&["separator"]),
            row(&["a", "b", "c"]),
            row(&["a", "b", "보령시", "d", "e"]),
            row(&["풍랑", "주의보", "보령시", "1", "2", "3", "extra"]),
        ];
        let state = normalize(&rows, &watch(&["보령시"]));
        assert!(state.is_empty());
    }

    #[test]
    fn test_four_column_before_any_header_has_empty_type() {
        let rows = vec![row(&["보령시", "1", "2", ""])];
        let state = normalize(&rows, &watch(&["보령시"]));
        let record = state.get(&key("보령시", "")).unwrap();
        assert_eq!(record.level, "");
    }

    #[test]
    fn test_cells_are_trimmed() {
        let rows = vec![row(&[" 풍랑 ", " 주의보 ", " 보령 시 ", " 1 ", " 2 ", "  "])];
        let state = normalize(&rows, &watch(&["보령시"]));
        let record = state.get(&key("보령시", "풍랑")).unwrap();
        assert_eq!(record.level, "주의보");
        assert_eq!(record.announce_time, "1");
        assert_eq!(record.clear_notice, "");
    }

    #[test]
    fn test_multiple_entries_form_one_key() {
        let rows = vec![row(&["풍랑", "주의보", "보령시, 서천군", "1", "2", ""])];
        let state = normalize(&rows, &watch(&["보령시", "서천군"]));
        assert_eq!(state.len(), 1);
        assert!(state.contains(&key("보령시, 서천군", "풍랑")));
    }

    #[test]
    fn test_later_row_overwrites_same_key() {
        let rows = vec![
            row(&["풍랑", "주의보", "보령시", "1", "2", ""]),
            row(&["보령시", "5", "6", ""]),
        ];
        let state = normalize(&rows, &watch(&["보령시"]));
        assert_eq!(state.len(), 1);
        assert_eq!(state.get(&key("보령시", "풍랑")).unwrap().announce_time, "5");
    }

    #[test]
    fn test_unwatched_rows_discarded() {
        let rows = vec![row(&["풍랑", "주의보", "부산", "1", "2", ""])];
        assert!(normalize(&rows, &watch(&["보령시"])).is_empty());
    }
}
