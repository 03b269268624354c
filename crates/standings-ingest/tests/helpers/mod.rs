//! Page fixtures shaped like the almanac's markup

#![allow(dead_code)]

pub fn index_page(years: &[i32]) -> String {
    let links: String = years
        .iter()
        .map(|y| format!("<td><a href=\"yearly/yr{y}a.shtml\">{y}</a></td>\n"))
        .collect();

    format!(
        "<html><body>\
         <a href=\"yearmenu.shtml?page=2\">2</a>\
         <table><tr>{links}</tr></table>\
         </body></html>"
    )
}

fn team_row(year: i32, cells: &[&str]) -> String {
    let mut tds = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i == 0 {
            tds.push_str(&format!(
                "<td class=\"datacolBox\"><a href=\"../teams/roster.php?y={year}&amp;t=X{i}\">{cell}</a></td>"
            ));
        } else {
            tds.push_str(&format!("<td class=\"datacolBox\">{cell}</td>"));
        }
    }
    format!("<tr>{tds}</tr>\n")
}

/// A season page with a National League decoy table ahead of the AL one
pub fn season_page(year: i32, rows: &[&[&str]]) -> String {
    let al_rows: String = rows.iter().map(|cells| team_row(year, cells)).collect();

    format!(
        "<html><body>\
         <div class=\"ba-table\"><table class=\"boxed\"><tbody>\
           <tr><td class=\"header\">{year} Hitting Leaders</td></tr>\
           <tr><td class=\"datacolBox\">Name</td></tr>\
           <tr><td class=\"datacolBox\">Someone</td><td class=\"datacolBox\">.350</td></tr>\
         </tbody></table></div>\
         <div class=\"ba-table\"><table class=\"boxed\"><tbody>\
           <tr><td class=\"header\">{year} American League Standings</td></tr>\
           <tr><td class=\"banner\">Team</td><td class=\"banner\">W</td></tr>\
           {al_rows}\
         </tbody></table></div>\
         </body></html>"
    )
}
