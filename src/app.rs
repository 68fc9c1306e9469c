//! eframe front-end over [`Session`]

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eframe::egui::{
    self, Align2, Color32, CursorIcon, FontId, Pos2, Rect, RichText, Sense, Shape, Stroke, Vec2,
};

use crate::board::{Board, CellRect, GridGeometry, ItemId, Point, Slot};
use crate::session::{reveal_folder, Notice, NoticeKind, Session};
use crate::thumbnail::{
    display_name, pdf_paths, OutlineRenderer, PageRenderer, PdfiumRenderer, PREVIEW_EDGE,
};

pub const WINDOW_TITLE: &str = "PDF Merger - PDF Reorder";

const CELL_MARGIN: f32 = 5.0;
const DELETE_SIZE: f32 = 20.0;
const ACCEPT: Color32 = Color32::from_rgb(0, 255, 0);
const REJECT: Color32 = Color32::from_rgb(255, 0, 0);

/// Startup settings, built from the command line
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub columns: usize,
    pub output_dir: PathBuf,
    pub pdfium_dir: Option<PathBuf>,
    pub initial_files: Vec<PathBuf>,
}

/// pdfium when it can be bound, page outlines otherwise
pub fn select_renderer(pdfium_dir: Option<&Path>) -> Box<dyn PageRenderer> {
    match PdfiumRenderer::bind(pdfium_dir) {
        Ok(renderer) => Box::new(renderer),
        Err(e) => {
            log::warn!("{}; previews will show page outlines only", e);
            Box::new(OutlineRenderer)
        }
    }
}

pub struct MergerApp {
    session: Session,
    renderer: Box<dyn PageRenderer>,
    textures: HashMap<ItemId, egui::TextureHandle>,
    dragging: Option<ItemId>,
    notice: Option<Notice>,
}

impl MergerApp {
    pub fn new(config: AppConfig) -> Self {
        let renderer = select_renderer(config.pdfium_dir.as_deref());
        let board = Board::new(GridGeometry {
            columns: config.columns,
            ..GridGeometry::default()
        });
        let mut session = Session::new(board, config.output_dir);
        session
            .board_mut()
            .add_items(&config.initial_files, renderer.as_ref());

        Self {
            session,
            renderer,
            textures: HashMap::new(),
            dragging: None,
            notice: None,
        }
    }

    fn select_files(&mut self) {
        if let Some(paths) = rfd::FileDialog::new()
            .set_title("Select PDF Files")
            .add_filter("PDF Files", &["pdf"])
            .pick_files()
        {
            self.session
                .board_mut()
                .add_items(paths, self.renderer.as_ref());
        }
    }

    /// Files dropped onto the window from the file manager
    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.session
                .board_mut()
                .add_items(pdf_paths(dropped), self.renderer.as_ref());
        }
    }

    /// Upload previews of new items and forget those of removed ones
    fn sync_textures(&mut self, ctx: &egui::Context) {
        let board = self.session.board();
        self.textures.retain(|id, _| board.item(*id).is_some());
        for item in board.items() {
            self.textures.entry(item.id).or_insert_with(|| {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    item.preview.size(),
                    &item.preview.rgba,
                );
                ctx.load_texture(
                    format!("thumbnail-{}", item.id),
                    image,
                    egui::TextureOptions::LINEAR,
                )
            });
        }
    }

    fn action_buttons(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let select = egui::Button::new(RichText::new("Select PDF Files").color(Color32::WHITE))
                .fill(Color32::from_rgb(0x4C, 0xAF, 0x50));
            if ui.add(select).clicked() {
                self.select_files();
            }

            let clear = egui::Button::new(RichText::new("Clear All PDFs").color(Color32::WHITE))
                .fill(Color32::from_rgb(0xF4, 0x43, 0x36));
            if ui.add(clear).clicked() {
                self.session.clear();
            }
        });
    }

    fn output_controls(&mut self, ui: &mut egui::Ui) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Output File Name:");
            if self.session.auto_name() {
                let mut shown = self.session.output_name().to_string();
                ui.add_enabled(false, egui::TextEdit::singleline(&mut shown));
            } else if let Some(name) = self.session.output_name_mut() {
                ui.text_edit_singleline(name);
            }
        });

        let mut auto_name = self.session.auto_name();
        if ui
            .checkbox(&mut auto_name, "Automatically name the output file")
            .changed()
        {
            self.session.set_auto_name(auto_name);
        }

        let merge = egui::Button::new(RichText::new("Merge PDFs").color(Color32::WHITE))
            .fill(Color32::from_rgb(0x00, 0x8C, 0xBA));
        if ui.add(merge).clicked() {
            let feedback = self.session.merge();
            if let Some(folder) = &feedback.reveal {
                reveal_folder(folder);
            }
            self.notice = Some(feedback.notice);
        }

        ui.add(egui::ProgressBar::new(self.session.progress()).show_percentage());
        ui.add_space(4.0);
    }

    fn grid(&mut self, ui: &mut egui::Ui) {
        let geometry = self.session.board().geometry();
        let size = Vec2::new(
            geometry.columns as f32 * geometry.cell_width,
            self.session.board().rows() as f32 * geometry.cell_height,
        );
        let (grid_rect, _) = ui.allocate_exact_size(size, Sense::hover());
        let origin = grid_rect.min;
        let to_board = |pos: Pos2| Point::new(pos.x - origin.x, pos.y - origin.y);

        let mut remove = None;
        let mut open_picker = false;

        for slot in self.session.board().layout() {
            let cell = screen_rect(origin, self.session.board().cell_rect(slot.cell()));
            let rect = cell.shrink(CELL_MARGIN);

            match slot {
                Slot::Item { id, .. } => {
                    let response = ui.interact(
                        rect,
                        ui.id().with(("thumbnail", id)),
                        Sense::click_and_drag(),
                    );
                    if response.drag_started_by(egui::PointerButton::Primary) {
                        self.dragging = Some(id);
                    }
                    if response.hovered() && self.dragging.is_none() {
                        ui.ctx().set_cursor_icon(CursorIcon::Grab);
                    }

                    if let Some(item) = self.session.board().item(id) {
                        let lifted = self.dragging == Some(id);
                        paint_item(
                            ui,
                            rect,
                            &item.path,
                            item.preview.size(),
                            self.textures.get(&id),
                            lifted,
                        );
                    }

                    let delete_rect = Rect::from_min_size(
                        Pos2::new(rect.max.x - DELETE_SIZE, rect.min.y),
                        Vec2::splat(DELETE_SIZE),
                    );
                    let delete = egui::Button::new(RichText::new("X").color(Color32::RED))
                        .fill(Color32::WHITE)
                        .stroke(Stroke::new(2.0, Color32::RED))
                        .rounding(DELETE_SIZE / 2.0);
                    if ui.put(delete_rect, delete).clicked() {
                        remove = Some(id);
                    }
                }
                Slot::Placeholder { .. } => {
                    let response = ui
                        .interact(rect, ui.id().with("placeholder"), Sense::click())
                        .on_hover_cursor(CursorIcon::PointingHand);
                    paint_placeholder(ui, rect);
                    if response.clicked() {
                        open_picker = true;
                    }
                }
            }
        }

        if let Some(id) = self.dragging {
            ui.ctx().set_cursor_icon(CursorIcon::Grabbing);
            let (pointer, released, down) = ui.input(|i| {
                (
                    i.pointer.interact_pos(),
                    i.pointer.any_released(),
                    i.pointer.any_down(),
                )
            });

            if let Some(pos) = pointer.filter(|p| grid_rect.contains(*p)) {
                let board_pos = to_board(pos);
                if let Some(hint) = self.session.board().drag_over(board_pos) {
                    let target = screen_rect(origin, self.session.board().cell_rect(hint.cell));
                    let color = if hint.accepted { ACCEPT } else { REJECT };
                    paint_dashed(ui, target, color);
                }
                if released {
                    self.session.board_mut().drop_item(id, board_pos);
                }
            }

            if released || !down {
                self.dragging = None;
            }
        }

        if let Some(id) = remove {
            self.session.board_mut().remove(id);
            self.textures.remove(&id);
        }
        if open_picker {
            self.select_files();
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = &self.notice else { return };

        let mut dismissed = false;
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                let color = match notice.kind {
                    NoticeKind::Info => ui.visuals().text_color(),
                    NoticeKind::Warning => ui.visuals().warn_fg_color,
                    NoticeKind::Error => ui.visuals().error_fg_color,
                };
                ui.colored_label(color, notice.message.as_str());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for MergerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Notices block the rest of the window until dismissed
        let enabled = self.notice.is_none();
        if enabled {
            self.accept_dropped_files(ctx);
        }
        self.sync_textures(ctx);

        egui::TopBottomPanel::top("actions").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.action_buttons(ui));
        });
        egui::TopBottomPanel::bottom("output").show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| self.output_controls(ui));
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_enabled_ui(enabled, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| self.grid(ui));
            });
        });

        self.show_notice(ctx);
    }
}

fn screen_rect(origin: Pos2, cell: CellRect) -> Rect {
    Rect::from_min_size(
        origin + Vec2::new(cell.x, cell.y),
        Vec2::new(cell.width, cell.height),
    )
}

fn paint_item(
    ui: &egui::Ui,
    rect: Rect,
    path: &Path,
    preview_size: [usize; 2],
    texture: Option<&egui::TextureHandle>,
    lifted: bool,
) {
    let painter = ui.painter();
    let visuals = ui.visuals();
    let fill = if lifted {
        visuals.faint_bg_color
    } else {
        visuals.extreme_bg_color
    };
    painter.rect_filled(rect, 4.0, fill);
    painter.rect_stroke(
        rect,
        4.0,
        Stroke::new(2.0, visuals.widgets.noninteractive.bg_stroke.color),
    );

    // Preview box, centered horizontally near the top of the cell
    let edge = PREVIEW_EDGE as f32;
    let frame = Rect::from_min_size(
        Pos2::new(rect.center().x - edge / 2.0, rect.min.y + 8.0),
        Vec2::splat(edge),
    );
    if let Some(texture) = texture {
        let [w, h] = preview_size;
        let image_rect = Rect::from_center_size(frame.center(), Vec2::new(w as f32, h as f32));
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture.id(), image_rect, uv, Color32::WHITE);
    }

    painter.text(
        Pos2::new(rect.center().x, frame.max.y + 14.0),
        Align2::CENTER_CENTER,
        display_name(path),
        FontId::proportional(11.0),
        visuals.strong_text_color(),
    );
}

fn paint_placeholder(ui: &egui::Ui, rect: Rect) {
    let painter = ui.painter();
    let color = Color32::GRAY;
    paint_dashed(ui, rect, color);
    painter.text(
        rect.center() - Vec2::new(0.0, 14.0),
        Align2::CENTER_CENTER,
        "+",
        FontId::proportional(40.0),
        color,
    );
    painter.text(
        rect.center() + Vec2::new(0.0, 28.0),
        Align2::CENTER_CENTER,
        "Add PDFs",
        FontId::proportional(12.0),
        ui.visuals().text_color(),
    );
}

fn paint_dashed(ui: &egui::Ui, rect: Rect, color: Color32) {
    let outline = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
        rect.left_top(),
    ];
    let shapes = Shape::dashed_line(&outline, Stroke::new(3.0, color), 6.0, 4.0);
    ui.painter().extend(shapes);
}
