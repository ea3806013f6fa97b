// Localized UI strings for English and Chinese

use crate::tps_game::{Difficulty, Phase};

#[derive(Clone)]
pub struct Assets {
    pub title: &'static str,

    // Control panel
    pub difficulty_label: &'static str,
    pub new_game: &'static str,
    pub time_label: &'static str,
    pub mines_fmt: &'static str, // "Mines: {}"

    // Phase banner
    pub phase_ready: &'static str,
    pub phase_playing: &'static str,
    pub phase_won: &'static str,
    pub phase_lost: &'static str,

    // Key hints
    pub hint_touch: &'static str,
    pub hint_mark: &'static str,
    pub hint_keys: &'static str,

    // Terminal size messages
    pub tsmsg_title: &'static str,
    pub tsmsg_line1: &'static str,
    pub tsmsg_line2: &'static str, // "Minimum size required: {} x {}"
}

/// Returns English language assets
pub fn english_assets() -> Assets {
    Assets {
        title: "Sweeper",

        difficulty_label: "Difficulty",
        new_game: "New Game",
        time_label: "Time",
        mines_fmt: "Mines: {}",

        phase_ready: "Tap a tile to begin",
        phase_playing: "Sweeping...",
        phase_won: "Cleared! You win",
        phase_lost: "Boom! You lose",

        hint_touch: "Tap twice to open",
        hint_mark: "Tap once and wait to mark",
        hint_keys: "1-3 level N new L lang Q quit",

        tsmsg_title: "Resize Terminal",
        tsmsg_line1: "Terminal size too small.",
        tsmsg_line2: "Minimum size required: {} x {}",
    }
}

/// Returns Chinese language assets
pub fn chinese_assets() -> Assets {
    Assets {
        title: "扫雷",

        difficulty_label: "难度",
        new_game: "新游戏",
        time_label: "时间",
        mines_fmt: "地雷：{}",

        phase_ready: "点击方块开始",
        phase_playing: "扫雷中……",
        phase_won: "全部扫清，你赢了",
        phase_lost: "踩雷了，你输了",

        hint_touch: "连点两次翻开",
        hint_mark: "点一次并等待以标记",
        hint_keys: "1-3 难度 N 新局 L 语言 Q 退出",

        tsmsg_title: "调整终端",
        tsmsg_line1: "终端屏幕布局过小",
        tsmsg_line2: "最小需要尺寸：{} x {}",
    }
}

fn normalize(lang_code: &str) -> &'static str {
    if lang_code.to_lowercase().starts_with("zh") {
        "zh"
    } else {
        "en"
    }
}

/// Holds the current language code and active string assets
pub struct Lang {
    pub current_lang: String,
    pub assets: Assets,
}

impl Lang {
    /// Normalizes the code ("zh-CN" → "zh"); unsupported languages fall back to English
    pub fn new(lang_code: &str) -> Self {
        let code = normalize(lang_code);
        Lang {
            current_lang: code.to_string(),
            assets: if code == "zh" {
                chinese_assets()
            } else {
                english_assets()
            },
        }
    }

    pub fn switch_to(&mut self, lang_code: &str) {
        *self = Lang::new(lang_code);
    }

    /// Flip between the two supported languages
    pub fn toggle(&mut self) {
        let next = if self.current_lang == "zh" { "en" } else { "zh" };
        self.switch_to(next);
    }

    pub fn phase_text(&self, phase: Phase) -> &'static str {
        match phase {
            Phase::Ready => self.assets.phase_ready,
            Phase::Playing => self.assets.phase_playing,
            Phase::Won => self.assets.phase_won,
            Phase::Lost => self.assets.phase_lost,
        }
    }

    pub fn mines_text(&self, difficulty: Difficulty) -> String {
        self.assets
            .mines_fmt
            .replace("{}", &difficulty.mine_count().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_normalization() {
        assert_eq!(Lang::new("zh-CN").current_lang, "zh");
        assert_eq!(Lang::new("en_US").current_lang, "en");
        assert_eq!(Lang::new("fr").current_lang, "en");
    }

    #[test]
    fn test_toggle_switches_assets() {
        let mut lang = Lang::new("en");
        lang.toggle();
        assert_eq!(lang.current_lang, "zh");
        assert_eq!(lang.assets.new_game, "新游戏");
        lang.toggle();
        assert_eq!(lang.phase_text(Phase::Lost), "Boom! You lose");
    }

    #[test]
    fn test_mines_text() {
        let lang = Lang::new("en");
        assert_eq!(lang.mines_text(Difficulty::Hard), "Mines: 60");
    }
}
