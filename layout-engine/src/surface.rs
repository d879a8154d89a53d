//! FILENAME: layout-engine/src/surface.rs
//! Fixed-grid drawing sinks.
//!
//! A surface receives the layout stream in order. `begin_page` is called
//! once before the first item and once for every page break; `finish`
//! once after the last item.

use crate::view::{CellLayout, LayoutItem, TextBox};

pub trait GridSurface {
    type Error;

    fn begin_page(&mut self) -> Result<(), Self::Error>;
    fn draw_text(&mut self, text: &TextBox) -> Result<(), Self::Error>;
    fn draw_cell(&mut self, cell: &CellLayout) -> Result<(), Self::Error>;

    fn finish(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Feeds a layout stream to a surface.
pub fn replay<S: GridSurface + ?Sized>(items: &[LayoutItem], surface: &mut S) -> Result<(), S::Error> {
    surface.begin_page()?;
    for item in items {
        match item {
            LayoutItem::Cell(cell) => surface.draw_cell(cell)?,
            LayoutItem::Text(text) => surface.draw_text(text)?,
            LayoutItem::PageBreak => surface.begin_page()?,
        }
    }
    surface.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{CellFill, RowRef};
    use records::Alignment;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl GridSurface for Recorder {
        type Error = String;

        fn begin_page(&mut self) -> Result<(), String> {
            self.events.push("page".to_string());
            Ok(())
        }

        fn draw_text(&mut self, text: &TextBox) -> Result<(), String> {
            self.events.push(format!("text:{}", text.text));
            Ok(())
        }

        fn draw_cell(&mut self, cell: &CellLayout) -> Result<(), String> {
            if cell.lines.first().map(|l| l == "fail").unwrap_or(false) {
                return Err("cannot draw".to_string());
            }
            self.events.push(format!("cell:{}", cell.lines.join("|")));
            Ok(())
        }

        fn finish(&mut self) -> Result<(), String> {
            self.events.push("done".to_string());
            Ok(())
        }
    }

    fn cell(text: &str) -> LayoutItem {
        LayoutItem::Cell(CellLayout {
            column: 0,
            row: RowRef::Data(0),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 8.0,
            lines: vec![text.to_string()],
            border: true,
            fill: CellFill::None,
            align: Alignment::Left,
        })
    }

    #[test]
    fn test_replay_order() {
        let items = vec![
            LayoutItem::Text(TextBox::new(0.0, 0.0, 10.0, 8.0, "title")),
            cell("a"),
            LayoutItem::PageBreak,
            cell("b"),
        ];
        let mut rec = Recorder::default();
        replay(&items, &mut rec).unwrap();
        assert_eq!(rec.events, vec!["page", "text:title", "cell:a", "page", "cell:b", "done"]);
    }

    #[test]
    fn test_replay_stops_on_error() {
        let items = vec![cell("a"), cell("fail"), cell("c")];
        let mut rec = Recorder::default();
        assert_eq!(replay(&items, &mut rec), Err("cannot draw".to_string()));
        assert_eq!(rec.events, vec!["page", "cell:a"]);
    }
}
