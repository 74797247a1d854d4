//! Block model: the ordered content instructions fed to the page flow engine

use tracing::trace;

/// One content instruction. Blocks render top-to-bottom in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// A paragraph, wrapped to the content width before rendering
    Text { text: String, size: f32 },
    /// A three-column table row
    Row {
        cells: [String; 3],
        header: bool,
        size: f32,
    },
}

impl Block {
    /// Create a paragraph block
    pub fn text<S: Into<String>>(text: S, size: f32) -> Self {
        Self::Text {
            text: text.into(),
            size,
        }
    }

    /// Create an ordinary table row
    pub fn row<A, B, C>(client: A, hours: B, amount: C, size: f32) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        Self::Row {
            cells: [client.into(), hours.into(), amount.into()],
            header: false,
            size,
        }
    }

    /// Create a table header row
    pub fn header<A, B, C>(client: A, hours: B, amount: C, size: f32) -> Self
    where
        A: Into<String>,
        B: Into<String>,
        C: Into<String>,
    {
        Self::Row {
            cells: [client.into(), hours.into(), amount.into()],
            header: true,
            size,
        }
    }

    /// Font size of the block
    pub fn size(&self) -> f32 {
        match self {
            Self::Text { size, .. } | Self::Row { size, .. } => *size,
        }
    }

    /// Whether this block is a table header row
    pub fn is_header(&self) -> bool {
        matches!(self, Self::Row { header: true, .. })
    }
}

/// An ordered, append-only sequence of blocks
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockList {
    pub blocks: Vec<Block>,
}

impl BlockList {
    /// Create an empty block list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a block
    pub fn add_block(mut self, block: Block) -> Self {
        trace!("Adding block {:?}", block);
        self.blocks.push(block);
        self
    }

    /// Append a paragraph
    pub fn add_text<S: Into<String>>(self, text: S, size: f32) -> Self {
        self.add_block(Block::text(text, size))
    }

    /// Append a block in place
    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the list has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over the blocks in render order
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }
}

impl FromIterator<Block> for BlockList {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self {
            blocks: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a BlockList {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
