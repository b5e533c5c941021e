//! A minimal retained scene tree and its X3D serialisation.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use svg::node::element::Element;
use svg::Node;

use crate::error;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneNode {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(tag: &str) -> SceneNode {
        SceneNode {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn set<T: ToString>(mut self, name: &str, value: T) -> SceneNode {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn add(mut self, child: SceneNode) -> SceneNode {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|value| value.as_str())
    }

    /// All nodes with `tag` in depth-first order, including `self`.
    pub fn find_all(&self, tag: &str) -> Vec<&SceneNode> {
        let mut found = vec![];
        if self.tag == tag {
            found.push(self);
        }
        for child in self.children.iter() {
            found.extend(child.find_all(tag));
        }
        found
    }

    /// All nodes whose `class` attribute is `class`, depth-first.
    pub fn find_class(&self, class: &str) -> Vec<&SceneNode> {
        let mut found = vec![];
        if self.attr("class") == Some(class) {
            found.push(self);
        }
        for child in self.children.iter() {
            found.extend(child.find_class(class));
        }
        found
    }

    pub fn to_element(&self) -> Element {
        let mut element = Element::new(self.tag.clone());
        for (name, value) in self.attributes.iter() {
            element.assign(name.clone(), value.clone());
        }
        for child in self.children.iter() {
            element.append(child.to_element());
        }
        element
    }
}

/// Wrap scene content in an `X3D > Scene` document element.
pub fn document(content: Vec<SceneNode>) -> Element {
    let mut scene = SceneNode::new("Scene");
    for node in content {
        scene = scene.add(node);
    }
    SceneNode::new("X3D")
        .set("profile", "Interchange")
        .set("version", "3.3")
        .add(scene)
        .to_element()
}

pub fn to_x3d_string(document: &Element) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}\n",
        document
    )
}

pub fn save_x3d(path: &Path, document: &Element) -> Result<(), error::Error> {
    fs::write(path, to_x3d_string(document))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> SceneNode {
        SceneNode::new("Group")
            .set("class", "layer")
            .add(SceneNode::new("Transform").set("class", "arrow").add(SceneNode::new("Shape")))
            .add(SceneNode::new("Transform").set("class", "arrow"))
    }

    #[test]
    fn test_builder() {
        let node = SceneNode::new("Cone").set("height", 1.0).set("bottomRadius", 0.4);
        assert_eq!(node.attr("height"), Some("1"));
        assert_eq!(node.attr("bottomRadius"), Some("0.4"));
        assert_eq!(node.attr("missing"), None);
    }

    #[test]
    fn test_find() {
        let tree = tree();
        assert_eq!(tree.find_all("Transform").len(), 2);
        assert_eq!(tree.find_all("Shape").len(), 1);
        assert_eq!(tree.find_class("arrow").len(), 2);
        assert_eq!(tree.find_class("layer").len(), 1);
    }

    #[test]
    fn test_x3d_output() {
        let text = to_x3d_string(&document(vec![tree()]));
        assert!(text.starts_with("<?xml"));
        assert!(text.contains("<X3D"));
        assert!(text.contains("<Scene>"));
        assert!(text.contains("class=\"arrow\""));
        assert!(text.contains("</X3D>"));
    }
}
