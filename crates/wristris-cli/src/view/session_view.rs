use wristris_engine::{BoardSize, RenderSink, Scoreboard, Sprite, SpriteFrame};

/// Terminal render sink; collects one presented frame for the widgets.
#[derive(Debug, Clone)]
pub struct SessionView {
    size: BoardSize,
    sprites: SpriteFrame,
    scoreboard: Scoreboard,
}

impl SessionView {
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            sprites: SpriteFrame::default(),
            scoreboard: Scoreboard::default(),
        }
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    pub fn sprites(&self) -> &[Sprite] {
        self.sprites.sprites()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }
}

impl RenderSink for SessionView {
    fn draw_sprites(&mut self, frame: &SpriteFrame) {
        self.sprites.clone_from(frame);
    }

    fn draw_scoreboard(&mut self, scoreboard: &Scoreboard) {
        self.scoreboard.clone_from(scoreboard);
    }
}
