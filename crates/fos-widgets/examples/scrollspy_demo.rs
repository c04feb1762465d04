//! Example: ScrollSpy following a scrolled container
//!
//! Run with `RUST_LOG=fos_widgets=debug` to see lifecycle logging.

use fos_widgets::{ComponentType, ScrollSpy, Ui};
use tracing_subscriber::EnvFilter;

const PAGE: &str = r##"
<nav id="navbar-example" class="navbar">
  <ul class="nav nav-pills">
    <li class="nav-item"><a class="nav-link" href="#first">First</a></li>
    <li class="nav-item"><a class="nav-link" href="#second">Second</a></li>
    <li class="nav-item dropdown">
      <a class="nav-link dropdown-toggle" href="#">More</a>
      <ul class="dropdown-menu">
        <li><a class="dropdown-item" href="#third">Third</a></li>
        <li><a class="dropdown-item" href="#fourth">Fourth</a></li>
      </ul>
    </li>
  </ul>
</nav>
<div id="content" data-bs-spy="scroll" data-bs-target="#navbar-example" data-bs-root-margin="0px 0px -40%"
     style="position: relative; height: 200px; overflow-y: scroll">
  <h4 id="first" style="height: 150px">First heading</h4>
  <h4 id="second" style="height: 150px">Second heading</h4>
  <h4 id="third" style="height: 150px">Third heading</h4>
  <h4 id="fourth" style="height: 150px">Fourth heading</h4>
</div>
"##;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut ui = Ui::new(fos_html::parse_fragment(PAGE)?);
    let created = ui.load()?;
    println!("Data API created {created} scrollspy instance(s)");

    let content = ui
        .document()
        .get_element_by_id("content")
        .ok_or_else(|| anyhow::anyhow!("missing #content"))?;

    ui.run_intersection_observers();
    for top in [0.0, 160.0, 310.0, 400.0, 0.0] {
        ui.scroll_to(content, top);
        let doc = ui.document();
        let active = ScrollSpy::get_instance(&ui, content)
            .and_then(|spy| spy.active_target())
            .map(|link| doc.tree().text_content(link))
            .unwrap_or_else(|| "none".to_string());
        println!("scrollTop {:>5.1} -> active: {active}", doc.scroll_top(content));
    }

    Ok(())
}
