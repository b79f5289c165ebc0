use crate::web_document::web_document;
use crate::web_error_handling::JsResult;


pub trait WebElementExt {
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element>;

    fn set_displayed(&self, displayed: bool) -> JsResult<()>;

    fn remove_all_children(&self);
    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element>;

    // Snapshot of the current child elements. `HtmlCollection` is live, so removing children
    // while iterating over it directly would skip elements.
    fn child_elements(&self) -> Vec<web_sys::Element>;
}

impl WebElementExt for web_sys::Element {
    fn with_classes<'a>(self, classes: impl IntoIterator<Item = &'a str>) -> JsResult<web_sys::Element> {
        for class in classes {
            self.class_list().add_1(class)?;
        }
        Ok(self)
    }

    fn set_displayed(&self, displayed: bool) -> JsResult<()> {
        self.class_list().toggle_with_force("display-none", !displayed)?;
        Ok(())
    }

    fn remove_all_children(&self) { self.replace_children_with_node_0() }

    fn append_new_element(&self, local_name: &str) -> JsResult<web_sys::Element> {
        let node = web_document()?.create_element(local_name)?;
        self.append_child(&node)?;
        Ok(node)
    }

    fn child_elements(&self) -> Vec<web_sys::Element> {
        let children = self.children();
        (0..children.length()).filter_map(|i| children.item(i)).collect()
    }
}
