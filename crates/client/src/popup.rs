use eframe::egui::{Align2, Area, Context, Frame, Id, Key, Order, Response, Ui};

/// Open/closed flag of a confirmation, kept in egui's temp memory.
#[derive(Clone, Copy, Default)]
struct Opened(bool);

impl Opened {
    fn get(ctx: &Context, id: Id) -> bool {
        ctx.data(|d| d.get_temp::<Self>(id)).unwrap_or_default().0
    }

    fn set(ctx: &Context, id: Id, opened: bool) {
        ctx.data_mut(|d| {
            if opened {
                d.insert_temp(id, Self(true));
            } else {
                d.remove::<Self>(id);
            }
        });
    }
}

/// Yes/No question shown under `anchor` after it is clicked.
///
/// Returns `Some(true)` on the frame "Yes" is clicked, `Some(false)` on "No".
/// Escape or a click outside closes it without an answer.
pub fn confirm_popup(ui: &Ui, id: Id, anchor: &Response, question: &str) -> Option<bool> {
    let ctx = ui.ctx();
    let mut opened = Opened::get(ctx, id);

    if anchor.clicked() {
        opened = !opened;
    }

    if !opened {
        Opened::set(ctx, id, false);
        return None;
    }

    let mut answer = None;

    let area = Area::new(id)
        .order(Order::Foreground)
        .constrain(true)
        .fixed_pos(anchor.rect.left_bottom())
        .pivot(Align2::LEFT_TOP)
        .show(ctx, |ui| {
            Frame::popup(ui.style()).show(ui, |ui| {
                ui.label(question);
                ui.horizontal(|ui| {
                    if ui.button("Yes").clicked() {
                        answer = Some(true);
                    }
                    if ui.button("No").clicked() {
                        answer = Some(false);
                    }
                });
            });
        });

    let dismissed = ui.input(|i| i.key_pressed(Key::Escape))
        || (anchor.clicked_elsewhere() && area.response.clicked_elsewhere());

    Opened::set(ctx, id, answer.is_none() && !dismissed);

    answer
}
