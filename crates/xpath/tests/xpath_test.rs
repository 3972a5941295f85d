use htmlstruct_xpath::{find_all, find_one, inner_text, parse, Document, NodeType, XPath};
use pretty_assertions::assert_eq;

const PAGE: &str = r#"
<html>
  <head><title>Catalog</title></head>
  <body>
    <div class="product" id="p1">
      <h2>Widget</h2>
      <a class="more" href="/items/widget">details</a>
      <span class="price">9.99</span>
    </div>
    <div class="product" id="p2">
      <h2>Gadget</h2>
      <a class="more" href="/items/gadget">details</a>
      <span class="price">24.50</span>
    </div>
    <!-- footer -->
  </body>
</html>
"#;

fn texts(nodes: &[htmlstruct_xpath::Node<'_>]) -> Vec<String> {
    nodes.iter().map(|n| n.inner_text().trim().to_string()).collect()
}

#[test]
fn test_find_all_in_document_order() {
    let doc = parse(PAGE).unwrap();
    let names = find_all(doc.root(), "//div[@class='product']/h2").unwrap();
    assert_eq!(texts(&names), vec!["Widget", "Gadget"]);
}

#[test]
fn test_relative_selectors_are_scoped() {
    let doc = parse(PAGE).unwrap();
    let products = find_all(doc.root(), "//div[@class='product']").unwrap();
    assert_eq!(products.len(), 2);

    let second = products[1];
    let title = find_one(second, "./h2").unwrap().unwrap();
    assert_eq!(inner_text(title), "Gadget");

    // absolute selectors ignore the context node
    let first_title = find_one(second, "//h2").unwrap().unwrap();
    assert_eq!(inner_text(first_title), "Widget");
}

#[test]
fn test_attribute_selection() {
    let doc = parse(PAGE).unwrap();
    let hrefs = find_all(doc.root(), "//a[@class='more']/@href").unwrap();
    assert_eq!(texts(&hrefs), vec!["/items/widget", "/items/gadget"]);
    assert_eq!(hrefs[0].node_type(), NodeType::Attribute);
    assert_eq!(hrefs[0].name(), "href");
    assert_eq!(hrefs[0].parent().unwrap().name(), "a");
}

#[test]
fn test_predicates_and_functions() {
    let doc = parse(PAGE).unwrap();
    let root = doc.root();

    let cheap = find_all(root, "//div[span[@class='price'] < 10]/h2").unwrap();
    assert_eq!(texts(&cheap), vec!["Widget"]);

    let by_prefix = find_all(root, "//a[starts-with(@href, '/items/g')]").unwrap();
    assert_eq!(by_prefix.len(), 1);

    let last = find_one(root, "(//h2)[last()]").unwrap().unwrap();
    assert_eq!(last.inner_text(), "Gadget");

    let contains = find_all(root, "//div[contains(@id, '2')]/h2/text()").unwrap();
    assert_eq!(texts(&contains), vec!["Gadget"]);
}

#[test]
fn test_comments_and_text_nodes() {
    let doc = parse(PAGE).unwrap();
    let comments = find_all(doc.root(), "//comment()").unwrap();
    assert_eq!(texts(&comments), vec!["footer"]);
    assert_eq!(comments[0].node_type(), NodeType::Comment);
}

#[test]
fn test_invalid_and_non_nodeset_selectors_error() {
    let doc = parse(PAGE).unwrap();
    assert!(find_all(doc.root(), "//div[").is_err());
    assert!(find_all(doc.root(), "string(//h2)").is_err());
    assert!(XPath::compile("").is_err());
}

#[test]
fn test_missing_match_is_none() {
    let doc = parse(PAGE).unwrap();
    assert!(find_one(doc.root(), "//table").unwrap().is_none());
    assert!(find_all(doc.root(), "//table").unwrap().is_empty());
}

#[test]
fn test_document_is_shared_across_threads() {
    let doc: Document = parse(PAGE).unwrap();

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let xpath = XPath::compile("//h2").unwrap();
                    let nodes = xpath.select(doc.root()).unwrap();
                    nodes.iter().map(|n| n.inner_text()).collect::<Vec<_>>()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), vec!["Widget", "Gadget"]);
        }
    });
}

#[test]
fn test_full_function_library_is_available() {
    let doc = parse("<ul><li>10</li><li>20</li><li>35</li></ul>").unwrap();
    let texts = |expr: &str| -> Vec<String> {
        find_all(doc.root(), expr)
            .unwrap()
            .iter()
            .map(|n| inner_text(*n))
            .collect()
    };

    assert_eq!(texts("//li[substring(., 2) = '5']"), vec!["35"]);
    assert_eq!(texts("//li[translate(., '0', 'x') = '2x']"), vec!["20"]);
    assert_eq!(texts("//li[. mod 10 = 5]"), vec!["35"]);
    assert_eq!(texts("//ul[sum(li) = 65]/li[round(1.6)]"), vec!["20"]);
    assert_eq!(texts("//li[floor(. div 10) = ceiling(2.5) - 1]"), vec!["20"]);
}
