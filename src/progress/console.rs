use std::io::Write;

use crate::progress::controller::DialogState;
use crate::progress::dialog::DialogView;

/// Text rendering of the dialog: prints each field when it changes.
pub struct ConsoleView<W: Write> {
    out: W,
    last: Option<DialogState>,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> ConsoleView<W> {
        ConsoleView { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, dialog: &DialogState) -> std::io::Result<()> {
        let last = self.last.as_ref();
        if last.is_none() {
            writeln!(self.out, "== {} ==", dialog.title)?;
        }
        if last.map(|l| &l.run_label) != Some(&dialog.run_label) {
            writeln!(self.out, "{}", dialog.run_label)?;
        }
        if last.map(|l| &l.epoch_label) != Some(&dialog.epoch_label) {
            writeln!(self.out, "  {}", dialog.epoch_label)?;
        }
        let already = last.map(|l| l.completion_log.len()).unwrap_or(0);
        for line in dialog.completion_log.iter().skip(already) {
            writeln!(self.out, "Completed models: {line}")?;
        }
        if last.map(|l| &l.button_label) != Some(&dialog.button_label) {
            writeln!(self.out, "[{}]", dialog.button_label)?;
        }
        if dialog.closed && !last.is_some_and(|l| l.closed) {
            writeln!(self.out, "(dialog closed)")?;
        }
        self.out.flush()
    }
}

impl<W: Write> DialogView for ConsoleView<W> {
    fn refresh(&mut self, dialog: &DialogState) {
        if self.last.as_ref() == Some(dialog) {
            return;
        }
        if let Err(err) = self.draw(dialog) {
            tracing::warn!("Failed to draw dialog: {err}");
        }
        self.last = Some(dialog.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DialogState {
        DialogState {
            title: "Training In Progress...".into(),
            indicator_running: true,
            run_label: "Currently training: ampA (1/2)".into(),
            epoch_label: "Training epoch in progress: (1/3)".into(),
            completion_log: vec![],
            button_label: "Cancel".into(),
            closed: false,
        }
    }

    #[test]
    fn prints_only_changes() {
        let mut view = ConsoleView::new(Vec::new());
        let mut s = state();
        view.refresh(&s);
        view.refresh(&s);
        s.epoch_label = "Training epoch in progress: (2/3)".into();
        s.completion_log.push("ampA: ESR = 0.0123".into());
        view.refresh(&s);

        let text = String::from_utf8(view.into_inner()).unwrap();
        assert_eq!(text, "== Training In Progress... ==\n\
                          Currently training: ampA (1/2)\n  \
                          Training epoch in progress: (1/3)\n\
                          [Cancel]\n  \
                          Training epoch in progress: (2/3)\n\
                          Completed models: ampA: ESR = 0.0123\n");
    }
}
