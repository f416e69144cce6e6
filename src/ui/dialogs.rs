use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::backend::Backend;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::workflow::Prompter;

use super::app::View;
use super::helpers::centered_rect;

/// Modal dialog drawn on top of the inventory view.
pub(crate) enum Dialog {
    Text {
        title: String,
        prompt: String,
        value: String,
    },
    Confirm {
        title: String,
        prompt: String,
        yes: bool,
    },
    Notice {
        title: String,
        message: String,
        error: bool,
    },
}

/// How a dialog was closed.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DialogOutcome {
    Text(Option<String>),
    Confirm(bool),
    Dismissed,
}

impl Dialog {
    pub(crate) fn text(title: &str, prompt: &str) -> Self {
        Dialog::Text {
            title: title.to_string(),
            prompt: prompt.to_string(),
            value: String::new(),
        }
    }

    /// Yes/no question with "Yes" preselected.
    pub(crate) fn confirm(title: &str, prompt: &str) -> Self {
        Dialog::Confirm {
            title: title.to_string(),
            prompt: prompt.to_string(),
            yes: true,
        }
    }

    pub(crate) fn notice(title: &str, message: &str, error: bool) -> Self {
        Dialog::Notice {
            title: title.to_string(),
            message: message.to_string(),
            error,
        }
    }

    /// Apply a key press. Returns the outcome once the dialog closes.
    pub(crate) fn handle_key(&mut self, code: KeyCode) -> Option<DialogOutcome> {
        match self {
            Dialog::Text { value, .. } => match code {
                KeyCode::Enter => Some(DialogOutcome::Text(Some(value.clone()))),
                KeyCode::Esc => Some(DialogOutcome::Text(None)),
                KeyCode::Backspace => {
                    value.pop();
                    None
                }
                KeyCode::Char(ch) if !ch.is_control() => {
                    value.push(ch);
                    None
                }
                _ => None,
            },
            Dialog::Confirm { yes, .. } => match code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(DialogOutcome::Confirm(true)),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    Some(DialogOutcome::Confirm(false))
                }
                KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                    *yes = !*yes;
                    None
                }
                KeyCode::Enter => Some(DialogOutcome::Confirm(*yes)),
                _ => None,
            },
            Dialog::Notice { .. } => match code {
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => {
                    Some(DialogOutcome::Dismissed)
                }
                _ => None,
            },
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let popup_area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, popup_area);

        let (title, border_style) = match self {
            Dialog::Notice {
                title, error: true, ..
            } => (title.as_str(), Style::default().fg(Color::Red)),
            Dialog::Text { title, .. }
            | Dialog::Confirm { title, .. }
            | Dialog::Notice { title, .. } => (title.as_str(), Style::default()),
        };
        let block = Block::default()
            .title(title.to_string())
            .borders(Borders::ALL)
            .border_style(border_style);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let hint = Style::default().fg(Color::Gray);
        let lines = match self {
            Dialog::Text { prompt, value, .. } => vec![
                Line::from(prompt.clone()),
                Line::from(""),
                Line::from(vec![
                    Span::raw("> "),
                    Span::styled(value.clone(), Style::default().fg(Color::Yellow)),
                ]),
                Line::from(""),
                Line::from(Span::styled("Enter to accept • Esc to cancel", hint)),
            ],
            Dialog::Confirm { prompt, yes, .. } => {
                let selected = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD);
                let (yes_style, no_style) = if *yes {
                    (selected, Style::default())
                } else {
                    (Style::default(), selected)
                };
                vec![
                    Line::from(prompt.clone()),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled(" Yes ", yes_style),
                        Span::raw("   "),
                        Span::styled(" No ", no_style),
                    ]),
                    Line::from(""),
                    Line::from(Span::styled("Y / N, or ←/→ and Enter", hint)),
                ]
            }
            Dialog::Notice { message, .. } => vec![
                Line::from(message.clone()),
                Line::from(""),
                Line::from(Span::styled("Press Enter to continue.", hint)),
            ],
        };

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Dialog::Text { value, .. } = self {
            let cursor_x = inner.x + 2 + value.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y + 2));
        }
    }
}

/// Blocking dialogs over a live terminal. Each call runs its own draw/read
/// loop and returns only once the user closes the dialog, so the workflow
/// sees a plain function call.
pub(crate) struct ModalPrompter<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    view: &'a View,
}

impl<'a, B: Backend> ModalPrompter<'a, B> {
    pub(crate) fn new(terminal: &'a mut Terminal<B>, view: &'a View) -> Self {
        Self { terminal, view }
    }

    /// Show an informational or error notice and wait for acknowledgement.
    pub(crate) fn notify(&mut self, title: &str, message: &str, error: bool) -> io::Result<()> {
        self.run(Dialog::notice(title, message, error)).map(|_| ())
    }

    fn run(&mut self, mut dialog: Dialog) -> io::Result<DialogOutcome> {
        let view = self.view;
        loop {
            self.terminal.draw(|frame| {
                view.draw_content(frame);
                dialog.draw(frame);
            })?;

            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press
                    || key_event.modifiers.contains(KeyModifiers::CONTROL)
                {
                    continue;
                }
                if let Some(outcome) = dialog.handle_key(key_event.code) {
                    return Ok(outcome);
                }
            }
        }
    }
}

impl<B: Backend> Prompter for ModalPrompter<'_, B> {
    fn ask_text(&mut self, title: &str, prompt: &str) -> io::Result<Option<String>> {
        match self.run(Dialog::text(title, prompt))? {
            DialogOutcome::Text(answer) => Ok(answer),
            _ => Ok(None),
        }
    }

    fn confirm(&mut self, title: &str, prompt: &str) -> io::Result<bool> {
        Ok(self.run(Dialog::confirm(title, prompt))? == DialogOutcome::Confirm(true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_dialog_collects_input_until_enter() {
        let mut dialog = Dialog::text("Issuer Card", "Card?");

        for ch in "C1x".chars() {
            assert_eq!(dialog.handle_key(KeyCode::Char(ch)), None);
        }
        dialog.handle_key(KeyCode::Backspace);

        assert_eq!(
            dialog.handle_key(KeyCode::Enter),
            Some(DialogOutcome::Text(Some("C1".to_string())))
        );
    }

    #[test]
    fn text_dialog_escape_cancels() {
        let mut dialog = Dialog::text("Issuer Card", "Card?");
        dialog.handle_key(KeyCode::Char('C'));

        assert_eq!(
            dialog.handle_key(KeyCode::Esc),
            Some(DialogOutcome::Text(None))
        );
    }

    #[test]
    fn confirm_defaults_to_yes_and_can_be_switched() {
        let mut dialog = Dialog::confirm("Confirm Entry", "Sure?");
        assert_eq!(
            Dialog::confirm("Confirm Entry", "Sure?").handle_key(KeyCode::Enter),
            Some(DialogOutcome::Confirm(true))
        );

        assert_eq!(dialog.handle_key(KeyCode::Right), None);
        assert_eq!(
            dialog.handle_key(KeyCode::Enter),
            Some(DialogOutcome::Confirm(false))
        );
    }

    #[test]
    fn confirm_shortcuts_answer_directly() {
        assert_eq!(
            Dialog::confirm("t", "p").handle_key(KeyCode::Char('n')),
            Some(DialogOutcome::Confirm(false))
        );
        assert_eq!(
            Dialog::confirm("t", "p").handle_key(KeyCode::Esc),
            Some(DialogOutcome::Confirm(false))
        );
        assert_eq!(
            Dialog::confirm("t", "p").handle_key(KeyCode::Char('Y')),
            Some(DialogOutcome::Confirm(true))
        );
    }

    #[test]
    fn notice_closes_on_enter_only_for_known_keys() {
        let mut dialog = Dialog::notice("Invalid Entry", "Nope", true);

        assert_eq!(dialog.handle_key(KeyCode::Char('x')), None);
        assert_eq!(
            dialog.handle_key(KeyCode::Enter),
            Some(DialogOutcome::Dismissed)
        );
    }
}
