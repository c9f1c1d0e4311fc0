use super::types::DragSession;

/// Numbers sessions and produces the start/end lines for the debug log.
#[derive(Debug, Default)]
pub(super) struct SessionLog {
    next_id: u64,
    active: Option<ActiveSession>,
}

#[derive(Debug)]
struct ActiveSession {
    id: u64,
    started_frame: u64,
    item_id: String,
    moves: u64,
}

impl SessionLog {
    pub(super) fn start(&mut self, frame: u64, session: &DragSession) -> String {
        let id = self.next_id.max(1);
        self.next_id = id.saturating_add(1);
        self.active = Some(ActiveSession {
            id,
            started_frame: frame,
            item_id: session.item_id.clone(),
            moves: 0,
        });
        format!(
            "session START id={id} item={} source={} index={} size=({:.1},{:.1})",
            session.item_id,
            session.source_container_id,
            session.source_index,
            session.item_size.x,
            session.item_size.y,
        )
    }

    pub(super) fn observe_move(&mut self) {
        if let Some(active) = &mut self.active {
            active.moves = active.moves.saturating_add(1);
        }
    }

    pub(super) fn end(&mut self, frame: u64, kind: &'static str) -> Option<String> {
        let ended = self.active.take()?;
        Some(format!(
            "session END id={} item={} kind={kind} moves={} started_frame={} end_frame={frame}",
            ended.id, ended.item_id, ended.moves, ended.started_frame
        ))
    }

    pub(super) fn active_id(&self) -> Option<u64> {
        self.active.as_ref().map(|a| a.id)
    }
}
