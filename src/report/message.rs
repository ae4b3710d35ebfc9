use crate::models::{AdvisoryRecord, Field, WatchList};
use crate::tracker::differ::{ActiveEntry, Classification};

/// Suffix appended to a field value that changed since the last cycle.
pub const UPDATE_MARKER: &str = " (Update)";

/// Render the notification body for a classification.
///
/// Returns `None` for no-op classifications: nothing should be sent.
pub fn render(classification: &Classification, watch: &WatchList) -> Option<String> {
    match classification {
        Classification::Quiet | Classification::Unchanged => None,
        Classification::FullClear { released } => Some(render_full_clear(released)),
        Classification::ActiveChange { active, released } => {
            Some(render_active(active, released, watch))
        }
    }
}

/// Liveness message sent when nothing is active and heartbeat is enabled.
pub fn render_heartbeat(watch: &WatchList) -> String {
    format!(
        "✅ [정상 작동 중]\n\n현재 {} 지역에\n발효 중인 특보가 없습니다.\n\n(이상 무!)",
        watch
    )
}

fn render_full_clear(released: &[AdvisoryRecord]) -> String {
    let mut out = String::from("🌈 기상특보 해제 🌈\n\n");
    for record in released {
        out.push_str(&release_line(record));
        out.push('\n');
    }
    out.push_str("\n모든 특보가 해제되었습니다.\n(상황 종료)");
    out
}

fn render_active(active: &[ActiveEntry], released: &[AdvisoryRecord], watch: &WatchList) -> String {
    let mut out = format!("🚨 기상특보 발효 🚨\n\n구역: {}\n", watch);

    for entry in active {
        let r = &entry.record;
        let mark = |field: Field| {
            let value = r.field(field);
            let value = if value.is_empty() { "-" } else { value };
            if entry.field_changed(field) {
                format!("{}{}", value, UPDATE_MARKER)
            } else {
                value.to_string()
            }
        };

        out.push_str(&format!(
            "\n[{} {}]\n지역: {}\n발표: {}\n발효: {}\n해제예고: {}\n",
            r.kind,
            mark(Field::Level),
            r.area,
            mark(Field::Announce),
            mark(Field::Effective),
            mark(Field::Clear),
        ));
    }

    if !released.is_empty() {
        out.push_str("\n🌈 해제된 특보\n");
        for record in released {
            out.push_str(&release_line(record));
            out.push('\n');
        }
    }

    out.push_str("\n기상청 홈페이지를 확인하세요.");
    out
}

fn release_line(record: &AdvisoryRecord) -> String {
    format!("- {} {} {} 해제", record.area, record.kind, record.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AdvisoryState;
    use crate::tracker::differ::classify;

    fn record(area: &str, kind: &str, level: &str) -> AdvisoryRecord {
        AdvisoryRecord {
            area: area.into(),
            kind: kind.into(),
            level: level.into(),
            announce_time: "10/17 10:00".into(),
            effective_time: "10/17 12:00".into(),
            clear_notice: String::new(),
        }
    }

    fn watch() -> WatchList {
        WatchList::new(vec!["보령시".into(), "태안군".into()])
    }

    fn state(records: &[AdvisoryRecord]) -> AdvisoryState {
        records.iter().cloned().collect()
    }

    #[test]
    fn test_noop_renders_nothing() {
        let s = state(&[record("보령시", "풍랑", "주의보")]);
        assert_eq!(render(&classify(&s, &s), &watch()), None);
        assert_eq!(
            render(&classify(&AdvisoryState::new(), &AdvisoryState::new()), &watch()),
            None
        );
    }

    #[test]
    fn test_full_clear_lists_released() {
        let prev = state(&[record("보령시", "풍랑", "주의보")]);
        let text = render(&classify(&prev, &AdvisoryState::new()), &watch()).unwrap();

        assert!(text.starts_with("🌈 기상특보 해제"));
        assert!(text.contains("- 보령시 풍랑 주의보 해제"));
        assert!(text.contains("모든 특보가 해제되었습니다."));
    }

    #[test]
    fn test_full_clear_one_line_per_release() {
        let prev = state(&[
            record("보령시", "풍랑", "주의보"),
            record("태안군", "강풍", "경보"),
        ]);
        let text = render(&classify(&prev, &AdvisoryState::new()), &watch()).unwrap();

        assert!(text.contains("- 보령시 풍랑 주의보 해제\n- 태안군 강풍 경보 해제\n\n모든"));
    }

    #[test]
    fn test_new_record_has_no_markers() {
        let curr = state(&[record("보령시", "풍랑", "주의보")]);
        let text = render(&classify(&AdvisoryState::new(), &curr), &watch()).unwrap();

        assert!(text.contains("구역: 보령시, 태안군"));
        assert!(text.contains("[풍랑 주의보]"));
        assert!(text.contains("지역: 보령시"));
        assert!(text.contains("발표: 10/17 10:00\n"));
        assert!(text.contains("해제예고: -\n"));
        assert!(!text.contains(UPDATE_MARKER));
    }

    #[test]
    fn test_updated_level_is_marked() {
        let prev = state(&[record("보령시", "풍랑", "주의보")]);
        let curr = state(&[record("보령시", "풍랑", "경보")]);
        let text = render(&classify(&prev, &curr), &watch()).unwrap();

        assert!(text.contains(&format!("[풍랑 경보{}]", UPDATE_MARKER)));
        assert!(text.contains("발표: 10/17 10:00\n"));
        assert!(text.contains("발효: 10/17 12:00\n"));
        assert_eq!(text.matches(UPDATE_MARKER).count(), 1);
    }

    #[test]
    fn test_partial_release_appends_release_lines() {
        let stay = record("보령시", "풍랑", "주의보");
        let gone = record("태안군", "강풍", "주의보");
        let text = render(
            &classify(&state(&[stay.clone(), gone]), &state(&[stay])),
            &watch(),
        )
        .unwrap();

        assert!(text.contains("[풍랑 주의보]"));
        assert!(text.contains("🌈 해제된 특보\n- 태안군 강풍 주의보 해제"));
    }

    #[test]
    fn test_heartbeat_names_watch_list() {
        assert!(render_heartbeat(&watch()).contains("보령시, 태안군 지역에"));
    }
}
