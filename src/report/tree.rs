use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One element of a parsed report. Attribute values are kept as the original
/// strings; extractors do their own numeric and date parsing.
#[derive(Debug, Clone)]
pub struct XmlNode {
    pub children: Vec<usize>,
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

/// Arena of elements in document order. Node 0 is a synthetic document node
/// whose only child is the root element.
#[derive(Debug)]
pub struct ParseTree {
    nodes: Vec<XmlNode>,
}

impl ParseTree {
    pub const DOCUMENT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![XmlNode {
                children: Vec::new(),
                name: String::new(),
                attributes: Vec::new(),
            }],
        }
    }

    /// Parse XML text. The error is a human-readable description of the first
    /// well-formedness problem.
    pub fn parse(text: &str) -> Result<Self, String> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut reader = Reader::from_str(text);
        let mut tree = Self::new();
        let mut open = vec![Self::DOCUMENT];

        loop {
            let event = reader
                .read_event()
                .map_err(|e| format!("{} (at byte {})", e, reader.error_position()))?;
            match event {
                Event::Start(start) => {
                    let id = tree.add_element(&open, &start)?;
                    open.push(id);
                }
                Event::Empty(start) => {
                    tree.add_element(&open, &start)?;
                }
                Event::End(_) => {
                    if open.len() > 1 {
                        open.pop();
                    }
                }
                // Only markup and whitespace may sit outside the root element.
                Event::Text(text)
                    if open.len() == 1
                        && !text.iter().all(|&b| matches!(b, b' ' | b'\t' | b'\r' | b'\n')) =>
                {
                    return Err(format!(
                        "text outside the root element (at byte {})",
                        reader.buffer_position()
                    ));
                }
                Event::CData(_) if open.len() == 1 => {
                    return Err(format!(
                        "CDATA outside the root element (at byte {})",
                        reader.buffer_position()
                    ));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(&unclosed) = open.last()
            && unclosed != Self::DOCUMENT
        {
            return Err(format!(
                "unexpected end of document inside <{}>",
                tree.nodes[unclosed].name
            ));
        }
        if tree.root_element().is_none() {
            return Err("document has no root element".into());
        }
        Ok(tree)
    }

    fn add_element(&mut self, open: &[usize], start: &BytesStart<'_>) -> Result<usize, String> {
        let parent = open.last().copied().unwrap_or(Self::DOCUMENT);
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        if parent == Self::DOCUMENT && !self.nodes[Self::DOCUMENT].children.is_empty() {
            return Err(format!("second root element <{}>", name));
        }

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| format!("bad attribute on <{}>: {}", name, e))?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|e| format!("bad value for {}: {}", key, e))?
                .into_owned();
            attributes.push((key, value));
        }

        Ok(self.add_child(parent, name, attributes))
    }

    /// Add a child element under a parent. Returns the node id.
    pub fn add_child(
        &mut self,
        parent_id: usize,
        name: String,
        attributes: Vec<(String, String)>,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(XmlNode {
            children: Vec::new(),
            name,
            attributes,
        });
        self.nodes[parent_id].children.push(id);
        id
    }

    pub fn get(&self, id: usize) -> Option<&XmlNode> {
        self.nodes.get(id)
    }

    pub fn root_element(&self) -> Option<usize> {
        self.nodes[Self::DOCUMENT].children.first().copied()
    }

    /// Find the first child of `parent` with the given name, or None.
    pub fn find_child_by_name(&self, parent: usize, name: &str) -> Option<usize> {
        self.children_named(parent, name).next()
    }

    /// All children of `parent` with the given name, in document order.
    pub fn children_named<'a>(
        &'a self,
        parent: usize,
        name: &'a str,
    ) -> impl Iterator<Item = usize> + 'a {
        self.nodes
            .get(parent)
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(move |&id| self.nodes.get(id).is_some_and(|n| n.name == name))
    }

    /// Follow a path of element names, taking the first match at each step.
    pub fn descend(&self, from: usize, path: &[&str]) -> Option<usize> {
        path.iter()
            .try_fold(from, |id, name| self.find_child_by_name(id, name))
    }

    /// Value of an attribute on a node, or None if either is missing.
    pub fn attr(&self, id: usize, key: &str) -> Option<&str> {
        self.nodes
            .get(id)?
            .attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
