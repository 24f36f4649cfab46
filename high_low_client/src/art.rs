use high_low_core::{Card, Rank, Suit};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// 牌面内容的宽高 (不含边框)
pub const FACE_WIDTH: usize = 7;
pub const FACE_HEIGHT: usize = 5;

/// 卡面资源的获取接口，渲染层只通过它拿到牌面
pub trait CardArt {
    fn face(&self, card: Card) -> &[String];
    fn back(&self) -> &[String];
}

/// 从目录加载的卡面，缺失的文件用占位图代替
pub struct LoadedArt {
    faces: HashMap<Card, Vec<String>>,
    back: Vec<String>,
}

impl LoadedArt {
    /// 读取 `<dir>/<rank>_of_<suit>.txt` 和 `<dir>/back.txt`
    pub fn load(dir: &Path) -> LoadedArt {
        let mut faces = HashMap::with_capacity(52);
        let mut placeholders = 0;

        for &suit in &Suit::ALL {
            for &rank in &Rank::ALL {
                let card = Card::new(rank, suit);
                let path = dir.join(format!("{}_of_{}.txt", rank.file_stem(), suit.name()));
                let art = read_art(&path).unwrap_or_else(|| {
                    placeholders += 1;
                    placeholder_face(card)
                });
                faces.insert(card, art);
            }
        }

        let back = read_art(&dir.join("back.txt")).unwrap_or_else(|| {
            placeholders += 1;
            placeholder_back()
        });

        info!("卡面加载完成: {}，其中 {} 个使用占位图", dir.display(), placeholders);
        LoadedArt { faces, back }
    }

    /// 全部使用占位图
    pub fn placeholders() -> LoadedArt {
        let faces = Suit::ALL
            .iter()
            .flat_map(|&suit| Rank::ALL.iter().map(move |&rank| Card::new(rank, suit)))
            .map(|card| (card, placeholder_face(card)))
            .collect();
        LoadedArt { faces, back: placeholder_back() }
    }
}

impl CardArt for LoadedArt {
    fn face(&self, card: Card) -> &[String] {
        self.faces.get(&card).map(Vec::as_slice).unwrap_or(&[])
    }

    fn back(&self) -> &[String] {
        &self.back
    }
}

fn read_art(path: &Path) -> Option<Vec<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Some(text.lines().take(FACE_HEIGHT).map(str::to_string).collect()),
        Err(e) => {
            debug!("卡面 {} 不可用: {}", path.display(), e);
            None
        }
    }
}

fn placeholder_face(card: Card) -> Vec<String> {
    let rank = card.rank.to_string();
    vec![
        format!("{:<w$}", rank, w = FACE_WIDTH),
        String::new(),
        format!("{:^w$}", card.suit.to_string(), w = FACE_WIDTH),
        String::new(),
        format!("{:>w$}", rank, w = FACE_WIDTH),
    ]
}

fn placeholder_back() -> Vec<String> {
    let fill = "░".repeat(FACE_WIDTH);
    vec![fill.clone(), fill.clone(), format!("{:░^w$}", "BACK", w = FACE_WIDTH), fill.clone(), fill]
}
