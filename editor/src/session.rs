use crate::Debounce;
use rte_core::{
    markup, toolbar_state, EditCommand, HistoryLog, ImageAttachment, MediaError, Selection,
    Surface, ToolbarState,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Quiet period before the owning form is notified of a new value.
pub const PROPAGATE_WINDOW: Duration = Duration::from_millis(150);
/// Quiet period before the history log takes a snapshot.
pub const HISTORY_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Inline,
    Expanded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Visual,
    Source,
}

/// Image insertion token. Captures the selection at request time; completion
/// inserts there without re-validating, so the point may be stale if the
/// user kept editing while the read was pending.
#[derive(Debug, Clone)]
pub struct PendingImage {
    path: PathBuf,
    selection: Selection,
}

/// The view coordinator: owns the inline surface, the optional full-screen
/// fork, the per-scope view modes, the history log, and both debounce
/// timers. The owning form is reached only through `on_change`.
pub struct EditorSession {
    inline: Surface,
    expanded: Option<Surface>,
    inline_mode: ViewMode,
    expanded_mode: ViewMode,
    inline_source: String,
    expanded_source: String,
    history: HistoryLog,
    toolbar: ToolbarState,
    propagate: Debounce,
    snapshot: Debounce,
    on_change: Box<dyn FnMut(&str)>,
}

impl EditorSession {
    pub fn new(initial: &str, on_change: Box<dyn FnMut(&str)>) -> Self {
        let inline = Surface::from_markup(initial);
        let canonical = inline.serialize();
        let toolbar = toolbar_state(&inline);
        Self {
            inline,
            expanded: None,
            inline_mode: ViewMode::Visual,
            expanded_mode: ViewMode::Visual,
            inline_source: String::new(),
            expanded_source: String::new(),
            history: HistoryLog::new(&canonical),
            toolbar,
            propagate: Debounce::new(PROPAGATE_WINDOW),
            snapshot: Debounce::new(HISTORY_WINDOW),
            on_change,
        }
    }

    pub fn scope(&self) -> Scope {
        if self.expanded.is_some() {
            Scope::Expanded
        } else {
            Scope::Inline
        }
    }

    pub fn mode(&self, scope: Scope) -> ViewMode {
        match scope {
            Scope::Inline => self.inline_mode,
            Scope::Expanded => self.expanded_mode,
        }
    }

    pub fn toolbar(&self) -> &ToolbarState {
        &self.toolbar
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The canonical Document: always the Inline scope's value. A live fork
    /// does not become canonical until it commits.
    pub fn document(&self) -> String {
        match self.inline_mode {
            ViewMode::Visual => self.inline.serialize(),
            ViewMode::Source => self.inline_source.clone(),
        }
    }

    /// Raw markup text shown in the active scope's Source view.
    pub fn source_text(&self) -> &str {
        match self.scope() {
            Scope::Inline => &self.inline_source,
            Scope::Expanded => &self.expanded_source,
        }
    }

    /// Read access to the active scope's live surface (block ids, caret).
    pub fn surface(&self) -> &Surface {
        self.active_surface()
    }

    fn active_mode(&self) -> ViewMode {
        self.mode(self.scope())
    }

    fn active_surface(&self) -> &Surface {
        self.expanded.as_ref().unwrap_or(&self.inline)
    }

    fn active_surface_mut(&mut self) -> &mut Surface {
        match &mut self.expanded {
            Some(fork) => fork,
            None => &mut self.inline,
        }
    }

    // ---- user input paths -------------------------------------------------

    /// A visual-surface edit replacing the active scope's content (the
    /// keystroke path). Arms both timers; neither fires until `tick`.
    pub fn edit(&mut self, markup: &str, now: Instant) {
        self.edit_in(self.scope(), markup, now);
    }

    /// Same as `edit`, addressed at an explicit scope. The inline surface
    /// stays editable while a fork is open; anything typed there is doomed
    /// to be overwritten by the fork's commit.
    pub fn edit_in(&mut self, scope: Scope, markup: &str, now: Instant) {
        if self.mode(scope) != ViewMode::Visual {
            return;
        }
        match scope {
            Scope::Inline => self.inline.load(markup),
            Scope::Expanded => match &mut self.expanded {
                Some(fork) => fork.load(markup),
                None => return,
            },
        }
        if scope == self.scope() {
            self.toolbar = toolbar_state(self.active_surface());
        }
        self.propagate.arm(now);
        self.snapshot.arm(now);
    }

    /// A raw-markup edit while the active scope shows the Source view. The
    /// text is trusted verbatim; no validation, no repair.
    pub fn edit_source(&mut self, text: &str, now: Instant) {
        if self.active_mode() != ViewMode::Source {
            return;
        }
        match self.scope() {
            Scope::Inline => self.inline_source = text.to_string(),
            Scope::Expanded => self.expanded_source = text.to_string(),
        }
        self.propagate.arm(now);
        self.snapshot.arm(now);
    }

    /// Caret/range moved. Pure refresh of the toolbar state.
    pub fn select(&mut self, selection: Selection) {
        self.active_surface_mut().set_selection(selection);
        self.toolbar = toolbar_state(self.active_surface());
    }

    /// Routes a toolbar command to the active surface. A command the
    /// selection cannot support is logged and dropped; the user sees a
    /// no-op, never a dialog.
    pub fn execute(&mut self, cmd: EditCommand, now: Instant) {
        if self.active_mode() != ViewMode::Visual {
            return;
        }
        if let Err(err) = self.active_surface_mut().execute(cmd) {
            tracing::warn!(%err, "editing command skipped");
            return;
        }
        self.after_edit(now);
    }

    pub fn insert_table(&mut self, rows: usize, cols: usize, now: Instant) {
        self.execute(EditCommand::InsertTable { rows, cols }, now);
    }

    pub fn insert_symbol(&mut self, glyph: &str, now: Instant) {
        self.execute(EditCommand::InsertSymbol(glyph.to_string()), now);
    }

    fn after_edit(&mut self, now: Instant) {
        self.toolbar = toolbar_state(self.active_surface());
        self.propagate.arm(now);
        self.snapshot.arm(now);
    }

    // ---- timers -----------------------------------------------------------

    /// Drives both debounce timers. Call from the host's frame/idle loop.
    pub fn tick(&mut self, now: Instant) {
        if self.propagate.take_due(now) {
            let doc = self.document();
            (self.on_change)(&doc);
        }
        if self.snapshot.take_due(now) {
            let doc = self.document();
            tracing::debug!(len = self.history.len(), "history snapshot");
            self.history.record(&doc);
        }
    }

    /// Immediate propagation for discontinuous changes; pending timers are
    /// cancelled rather than left to fire on stale content.
    fn propagate_now(&mut self) {
        self.propagate.cancel();
        let doc = self.document();
        (self.on_change)(&doc);
    }

    // ---- history ----------------------------------------------------------

    /// Bypasses both debounces: reloads the snapshot, refreshes the toolbar,
    /// and notifies the owning form synchronously.
    pub fn undo(&mut self) {
        let Some(snap) = self.history.undo() else {
            return;
        };
        self.load_snapshot(&snap);
    }

    pub fn redo(&mut self) {
        let Some(snap) = self.history.redo() else {
            return;
        };
        self.load_snapshot(&snap);
    }

    fn load_snapshot(&mut self, snap: &str) {
        self.snapshot.cancel();
        self.inline.load(snap);
        if self.inline_mode == ViewMode::Source {
            self.inline_source = markup::pretty_print(snap);
        }
        if self.scope() == Scope::Inline {
            self.toolbar = toolbar_state(&self.inline);
        }
        self.propagate_now();
    }

    // ---- scope transitions ------------------------------------------------

    /// Inline -> Expanded checks out a copy of the inline Document into an
    /// independent fork; Expanded -> Inline commits the fork back as
    /// canonical. Last writer wins: inline edits made while the fork was
    /// open are discarded by the commit.
    pub fn toggle_expanded(&mut self) {
        match self.expanded.take() {
            None => {
                tracing::debug!("expanded checkout");
                // The fork inherits the view mode and, in Source, the
                // working text, so raw-markup editing continues seamlessly.
                self.expanded_mode = self.inline_mode;
                self.expanded_source = self.inline_source.clone();
                self.expanded = Some(self.inline.clone());
            }
            Some(fork) => {
                let doc = match self.expanded_mode {
                    ViewMode::Visual => fork.serialize(),
                    ViewMode::Source => self.expanded_source.clone(),
                };
                tracing::debug!("expanded commit");
                self.inline.load(&doc);
                if self.inline_mode == ViewMode::Source {
                    self.inline_source = markup::pretty_print(&doc);
                }
                self.expanded_source.clear();
                self.snapshot.cancel();
                self.history.record(&self.document());
                self.toolbar = toolbar_state(&self.inline);
                self.propagate_now();
            }
        }
    }

    /// Escape while the overlay is open closes it; otherwise a no-op. The
    /// host installs its global key listener only for the overlay's
    /// lifetime.
    pub fn escape(&mut self) {
        if self.expanded.is_some() {
            self.toggle_expanded();
        }
    }

    /// Visual -> Source pretty-prints the active buffer into editable text;
    /// Source -> Visual loads the (possibly hand-edited) text verbatim.
    /// Either direction is synchronous and bypasses the timers.
    pub fn toggle_source(&mut self) {
        let scope = self.scope();
        match self.mode(scope) {
            ViewMode::Visual => {
                let text = markup::pretty_print(&self.active_surface().serialize());
                match scope {
                    Scope::Inline => {
                        self.inline_source = text;
                        self.inline_mode = ViewMode::Source;
                    }
                    Scope::Expanded => {
                        self.expanded_source = text;
                        self.expanded_mode = ViewMode::Source;
                    }
                }
                tracing::debug!(?scope, "source view opened");
            }
            ViewMode::Source => {
                let text = match scope {
                    Scope::Inline => std::mem::take(&mut self.inline_source),
                    Scope::Expanded => std::mem::take(&mut self.expanded_source),
                };
                self.active_surface_mut().load(&text);
                match scope {
                    Scope::Inline => self.inline_mode = ViewMode::Visual,
                    Scope::Expanded => self.expanded_mode = ViewMode::Visual,
                }
                self.toolbar = toolbar_state(self.active_surface());
                tracing::debug!(?scope, "source view closed");
                if scope == Scope::Inline {
                    self.snapshot.cancel();
                    self.history.record(&self.document());
                }
                self.propagate_now();
            }
        }
    }

    // ---- external value ---------------------------------------------------

    /// Inbound value from the owning form. Replaces the canonical Document
    /// without echoing back through `on_change`.
    pub fn set_value(&mut self, raw: &str) {
        self.propagate.cancel();
        self.snapshot.cancel();
        self.inline.load(raw);
        if self.inline_mode == ViewMode::Source {
            self.inline_source = markup::pretty_print(raw);
        }
        self.history.record(&self.document());
        if self.scope() == Scope::Inline {
            self.toolbar = toolbar_state(&self.inline);
        }
    }

    // ---- media ------------------------------------------------------------

    /// Captures the selection now; the file read happens at completion time.
    pub fn request_image(&mut self, path: &Path) -> PendingImage {
        PendingImage {
            path: path.to_path_buf(),
            selection: self.active_surface().selection,
        }
    }

    /// Finishes a pending image insertion at the captured selection. The
    /// selection is not re-validated; if the user moved on, the image lands
    /// at the stale point.
    pub fn complete_image(&mut self, pending: PendingImage, now: Instant) -> Result<(), MediaError> {
        let attachment = ImageAttachment::read(&pending.path)?;
        let surface = self.active_surface_mut();
        let current = surface.selection;
        surface.set_selection(pending.selection);
        let result = surface.execute(EditCommand::InsertImage {
            src: attachment.data_url,
            alt: Some(attachment.name),
        });
        surface.set_selection(current);
        if let Err(err) = result {
            tracing::warn!(%err, "image insertion skipped");
            return Ok(());
        }
        self.after_edit(now);
        Ok(())
    }
}
