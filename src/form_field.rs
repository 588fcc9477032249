//! The two single-line fields of the email sign-in form.
//!
//! Editing happens in [`FieldBuffer`], which knows nothing about gpui; the
//! [`FormField`] entity feeds it keystrokes and IME input and paints it.

use std::ops::Range;

use gpui::{
    App, Bounds, Context, CursorStyle, ElementId, ElementInputHandler, Entity, EntityInputHandler,
    FocusHandle, Focusable, GlobalElementId, Hsla, LayoutId, MouseButton, MouseDownEvent, PaintQuad,
    Pixels, Point, ShapedLine, SharedString, Style, TextAlign, TextRun, UTF16Selection, Window,
    actions, div, fill, point, prelude::*, px, relative, rgb, rgba,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::theme::*;

actions!(
    form_field,
    [Backspace, Delete, Left, Right, Home, End, SelectAll, Paste]
);

const MASK: char = '•';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Email,
    Password,
}

impl FieldKind {
    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Email => "Email Address",
            Self::Password => "Password",
        }
    }

    pub fn is_masked(self) -> bool {
        self == Self::Password
    }

    /// Line breaks never fit; an address has no whitespace at all.
    pub fn accepts(self, character: char) -> bool {
        match self {
            Self::Email => !character.is_whitespace(),
            Self::Password => !matches!(character, '\n' | '\r'),
        }
    }

    pub fn sanitize(self, text: &str) -> String {
        text.chars()
            .filter(|character| self.accepts(*character))
            .collect()
    }
}

/// Field text with a selection and an optional IME composition, all as byte
/// offsets on grapheme boundaries. The caret sits at the selection end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldBuffer {
    text: String,
    selection: Range<usize>,
    marked: Option<Range<usize>>,
}

impl FieldBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    fn caret(&self) -> usize {
        self.selection.end
    }

    fn collapse_to(&mut self, offset: usize) {
        self.selection = offset..offset;
    }

    fn previous_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .rev()
            .map(|(index, _)| index)
            .find(|index| *index < offset)
            .unwrap_or(0)
    }

    fn next_boundary(&self, offset: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .map(|(index, _)| index)
            .find(|index| *index > offset)
            .unwrap_or(self.text.len())
    }

    pub fn move_left(&mut self) {
        let target = if self.selection.is_empty() {
            self.previous_boundary(self.caret())
        } else {
            self.selection.start
        };
        self.collapse_to(target);
    }

    pub fn move_right(&mut self) {
        let target = if self.selection.is_empty() {
            self.next_boundary(self.caret())
        } else {
            self.selection.end
        };
        self.collapse_to(target);
    }

    pub fn home(&mut self) {
        self.collapse_to(0);
    }

    pub fn end(&mut self) {
        self.collapse_to(self.text.len());
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.text.len();
    }

    pub fn backspace(&mut self) {
        if self.selection.is_empty() {
            self.selection = self.previous_boundary(self.caret())..self.caret();
        }
        self.replace(None, "");
    }

    pub fn delete(&mut self) {
        if self.selection.is_empty() {
            self.selection = self.caret()..self.next_boundary(self.caret());
        }
        self.replace(None, "");
    }

    /// Composition first, then the selection, when no range is given.
    fn target(&self, range: Option<Range<usize>>) -> Range<usize> {
        range
            .or_else(|| self.marked.clone())
            .unwrap_or_else(|| self.selection.clone())
    }

    pub fn replace(&mut self, range: Option<Range<usize>>, text: &str) {
        let range = self.target(range);
        self.text.replace_range(range.clone(), text);
        self.collapse_to(range.start + text.len());
        self.marked = None;
    }

    /// Inserts in-progress IME text and keeps it marked. `selected` is
    /// relative to the inserted text.
    pub fn compose(
        &mut self,
        range: Option<Range<usize>>,
        text: &str,
        selected: Option<Range<usize>>,
    ) {
        let range = self.target(range);
        self.text.replace_range(range.clone(), text);
        self.marked = (!text.is_empty()).then(|| range.start..range.start + text.len());
        self.selection = match selected {
            Some(selected) => range.start + selected.start..range.start + selected.end,
            None => {
                let caret = range.start + text.len();
                caret..caret
            }
        };
    }

    pub fn unmark(&mut self) {
        self.marked = None;
    }

    pub fn display(&self, masked: bool) -> String {
        if masked {
            self.text.graphemes(true).map(|_| MASK).collect()
        } else {
            self.text.clone()
        }
    }

    pub fn to_display(&self, offset: usize, masked: bool) -> usize {
        if masked {
            self.text[..offset].graphemes(true).count() * MASK.len_utf8()
        } else {
            offset
        }
    }

    pub fn from_display(&self, display_offset: usize, masked: bool) -> usize {
        if !masked {
            return display_offset.min(self.text.len());
        }
        self.text
            .grapheme_indices(true)
            .nth(display_offset / MASK.len_utf8())
            .map(|(index, _)| index)
            .unwrap_or(self.text.len())
    }

    pub fn to_utf16(&self, offset: usize) -> usize {
        self.text[..offset.min(self.text.len())]
            .chars()
            .map(char::len_utf16)
            .sum()
    }

    pub fn from_utf16(&self, offset_utf16: usize) -> usize {
        let mut units = 0;
        for (index, character) in self.text.char_indices() {
            if units >= offset_utf16 {
                return index;
            }
            units += character.len_utf16();
        }
        self.text.len()
    }

    fn range_to_utf16(&self, range: &Range<usize>) -> Range<usize> {
        self.to_utf16(range.start)..self.to_utf16(range.end)
    }

    fn range_from_utf16(&self, range: &Range<usize>) -> Range<usize> {
        self.from_utf16(range.start)..self.from_utf16(range.end)
    }
}

pub struct FormField {
    pub focus_handle: FocusHandle,
    kind: FieldKind,
    buffer: FieldBuffer,
    last_layout: Option<ShapedLine>,
    last_bounds: Option<Bounds<Pixels>>,
}

impl FormField {
    pub fn new(context: &mut App, kind: FieldKind) -> Entity<Self> {
        context.new(|context| Self {
            focus_handle: context.focus_handle(),
            kind,
            buffer: FieldBuffer::default(),
            last_layout: None,
            last_bounds: None,
        })
    }

    pub fn text(&self) -> &str {
        self.buffer.text()
    }

    fn edit(&mut self, context: &mut Context<Self>, change: impl FnOnce(&mut FieldBuffer)) {
        change(&mut self.buffer);
        context.notify();
    }

    fn backspace(&mut self, _: &Backspace, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::backspace);
    }

    fn delete(&mut self, _: &Delete, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::delete);
    }

    fn left(&mut self, _: &Left, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::move_left);
    }

    fn right(&mut self, _: &Right, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::move_right);
    }

    fn home(&mut self, _: &Home, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::home);
    }

    fn end(&mut self, _: &End, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::end);
    }

    fn select_all(&mut self, _: &SelectAll, _: &mut Window, context: &mut Context<Self>) {
        self.edit(context, FieldBuffer::select_all);
    }

    fn paste(&mut self, _: &Paste, _: &mut Window, context: &mut Context<Self>) {
        let Some(text) = context.read_from_clipboard().and_then(|item| item.text()) else {
            return;
        };
        let text = self.kind.sanitize(&text);
        self.edit(context, |buffer| buffer.replace(None, &text));
    }

    fn place_caret(&mut self, event: &MouseDownEvent, _: &mut Window, context: &mut Context<Self>) {
        let (Some(bounds), Some(line)) = (self.last_bounds, self.last_layout.as_ref()) else {
            return;
        };
        let display_offset = line.closest_index_for_x(event.position.x - bounds.left());
        let offset = self
            .buffer
            .from_display(display_offset, self.kind.is_masked());
        self.edit(context, |buffer| buffer.collapse_to(offset));
    }
}

impl EntityInputHandler for FormField {
    fn text_for_range(
        &mut self,
        range_utf16: Range<usize>,
        actual_range: &mut Option<Range<usize>>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<String> {
        let range = self.buffer.range_from_utf16(&range_utf16);
        actual_range.replace(self.buffer.range_to_utf16(&range));
        Some(self.buffer.text()[range].to_string())
    }

    fn selected_text_range(
        &mut self,
        _ignore_disabled_input: bool,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<UTF16Selection> {
        Some(UTF16Selection {
            range: self.buffer.range_to_utf16(&self.buffer.selection()),
            reversed: false,
        })
    }

    fn marked_text_range(
        &self,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<Range<usize>> {
        self.buffer
            .marked
            .as_ref()
            .map(|range| self.buffer.range_to_utf16(range))
    }

    fn unmark_text(&mut self, _window: &mut Window, _context: &mut Context<Self>) {
        self.buffer.unmark();
    }

    fn replace_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        let range = range_utf16.map(|range| self.buffer.range_from_utf16(&range));
        let text = self.kind.sanitize(new_text);
        self.edit(context, |buffer| buffer.replace(range, &text));
    }

    fn replace_and_mark_text_in_range(
        &mut self,
        range_utf16: Option<Range<usize>>,
        new_text: &str,
        new_selected_range_utf16: Option<Range<usize>>,
        _window: &mut Window,
        context: &mut Context<Self>,
    ) {
        let range = range_utf16.map(|range| self.buffer.range_from_utf16(&range));
        let text = self.kind.sanitize(new_text);
        let selected = new_selected_range_utf16.map(|selected| {
            let inserted = FieldBuffer {
                text: text.clone(),
                ..FieldBuffer::default()
            };
            inserted.range_from_utf16(&selected)
        });
        self.edit(context, |buffer| buffer.compose(range, &text, selected));
    }

    fn bounds_for_range(
        &mut self,
        range_utf16: Range<usize>,
        bounds: Bounds<Pixels>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<Bounds<Pixels>> {
        let line = self.last_layout.as_ref()?;
        let masked = self.kind.is_masked();
        let range = self.buffer.range_from_utf16(&range_utf16);
        let start = line.x_for_index(self.buffer.to_display(range.start, masked));
        let end = line.x_for_index(self.buffer.to_display(range.end, masked));
        Some(Bounds::from_corners(
            point(bounds.left() + start, bounds.top()),
            point(bounds.left() + end, bounds.bottom()),
        ))
    }

    fn character_index_for_point(
        &mut self,
        position: Point<Pixels>,
        _window: &mut Window,
        _context: &mut Context<Self>,
    ) -> Option<usize> {
        let local = self.last_bounds?.localize(&position)?;
        let line = self.last_layout.as_ref()?;
        let display_offset = line.index_for_x(local.x)?;
        let offset = self
            .buffer
            .from_display(display_offset, self.kind.is_masked());
        Some(self.buffer.to_utf16(offset))
    }
}

struct FieldText {
    field: Entity<FormField>,
}

struct FieldPaint {
    line: Option<ShapedLine>,
    caret: Option<PaintQuad>,
    selection: Option<PaintQuad>,
}

impl IntoElement for FieldText {
    type Element = Self;

    fn into_element(self) -> Self::Element {
        self
    }
}

impl Element for FieldText {
    type RequestLayoutState = ();
    type PrepaintState = FieldPaint;

    fn id(&self) -> Option<ElementId> {
        None
    }

    fn source_location(&self) -> Option<&'static core::panic::Location<'static>> {
        None
    }

    fn request_layout(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        window: &mut Window,
        context: &mut App,
    ) -> (LayoutId, Self::RequestLayoutState) {
        let mut style = Style::default();
        style.size.width = relative(1.).into();
        style.size.height = window.line_height().into();
        (window.request_layout(style, [], context), ())
    }

    fn prepaint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        window: &mut Window,
        context: &mut App,
    ) -> Self::PrepaintState {
        let field = self.field.read(context);
        let buffer = &field.buffer;
        let masked = field.kind.is_masked();
        let style = window.text_style();

        let (shown, color): (SharedString, Hsla) = if buffer.text().is_empty() {
            (field.kind.placeholder().into(), rgb(INPUT_PLACEHOLDER).into())
        } else {
            (buffer.display(masked).into(), style.color)
        };
        let run = TextRun {
            len: shown.len(),
            font: style.font(),
            color,
            background_color: None,
            underline: None,
            strikethrough: None,
        };
        let font_size = style.font_size.to_pixels(window.rem_size());
        let line = window
            .text_system()
            .shape_line(shown, font_size, &[run], None);

        let selection = buffer.selection();
        let x_at = |offset: usize| bounds.left() + line.x_for_index(buffer.to_display(offset, masked));
        let (selection, caret) = if selection.is_empty() {
            let caret = fill(
                Bounds::new(
                    point(x_at(selection.end), bounds.top()),
                    gpui::size(px(CURSOR_WIDTH), bounds.bottom() - bounds.top()),
                ),
                rgb(BUTTON_AMBER),
            );
            (None, Some(caret))
        } else {
            let highlight = fill(
                Bounds::from_corners(
                    point(x_at(selection.start), bounds.top()),
                    point(x_at(selection.end), bounds.bottom()),
                ),
                rgba(SELECTION),
            );
            (Some(highlight), None)
        };

        FieldPaint {
            line: Some(line),
            caret,
            selection,
        }
    }

    fn paint(
        &mut self,
        _id: Option<&GlobalElementId>,
        _inspector_id: Option<&gpui::InspectorElementId>,
        bounds: Bounds<Pixels>,
        _request_layout: &mut Self::RequestLayoutState,
        prepaint: &mut Self::PrepaintState,
        window: &mut Window,
        context: &mut App,
    ) {
        let focus_handle = self.field.read(context).focus_handle.clone();
        window.handle_input(
            &focus_handle,
            ElementInputHandler::new(bounds, self.field.clone()),
            context,
        );
        if let Some(selection) = prepaint.selection.take() {
            window.paint_quad(selection);
        }
        let Some(line) = prepaint.line.take() else {
            return;
        };
        if let Err(error) = line.paint(
            bounds.origin,
            window.line_height(),
            TextAlign::Left,
            None,
            window,
            context,
        ) {
            log::warn!("[form_field] failed to paint line: {error}");
        }
        if focus_handle.is_focused(window)
            && let Some(caret) = prepaint.caret.take()
        {
            window.paint_quad(caret);
        }
        self.field.update(context, |field, _| {
            field.last_layout = Some(line);
            field.last_bounds = Some(bounds);
        });
    }
}

impl Render for FormField {
    fn render(&mut self, window: &mut Window, context: &mut Context<Self>) -> impl IntoElement {
        let border = if self.focus_handle.is_focused(window) {
            rgba(BORDER_FOCUS)
        } else {
            rgba(BORDER_FAINT)
        };

        div()
            .key_context("FormField")
            .track_focus(&self.focus_handle(context))
            .on_action(context.listener(Self::backspace))
            .on_action(context.listener(Self::delete))
            .on_action(context.listener(Self::left))
            .on_action(context.listener(Self::right))
            .on_action(context.listener(Self::home))
            .on_action(context.listener(Self::end))
            .on_action(context.listener(Self::select_all))
            .on_action(context.listener(Self::paste))
            .on_mouse_down(MouseButton::Left, context.listener(Self::place_caret))
            .flex()
            .items_center()
            .w_full()
            .h(px(ELEMENT_HEIGHT))
            .px(px(PADDING_INPUT_HORIZONTAL))
            .cursor(CursorStyle::IBeam)
            .bg(rgba(INPUT_BACKGROUND))
            .border_1()
            .border_color(border)
            .rounded(px(RADIUS_INPUT))
            .text_color(rgba(TEXT_BRIGHT))
            .text_size(px(TEXT_SIZE_MEDIUM))
            .line_height(px(LINE_HEIGHT_MEDIUM))
            .child(FieldText {
                field: context.entity().clone(),
            })
    }
}

impl Focusable for FormField {
    fn focus_handle(&self, _: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}
